use std::process::Command;
use std::path::Path;
use std::collections::HashMap;
use anyhow::{anyhow, Result};

const HEADER: &str = "transaction_id,amount,account_id,location,transaction_time,elapsed_time,frequency,fraud_label";

fn run_sample(name: &str) -> Result<String> {
    let binary_path = env!("CARGO_BIN_EXE_fraud-sentinel");
    let sample_path = Path::new("samples").join(name);

    let output = Command::new(binary_path)
        .arg(sample_path)
        .env_remove("FRAUD_SENTINEL__RISK_MODEL__URL")
        .output()?;

    assert!(output.status.success());

    Ok(String::from_utf8(output.stdout)?)
}

/// Collects the fraud labels of every output row, grouped by account in chronological order.
fn labels_by_account(stdout: &str) -> HashMap<String, Vec<String>> {
    let mut results: HashMap<String, Vec<String>> = HashMap::new();

    for line in stdout.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        results.entry(fields[2].to_string()).or_default().push(fields[7].to_string());
    }

    results
}

#[test]
fn test_cli_correctly_processes_sample() -> Result<()> {
    let stdout = run_sample("sample.csv")?;
    let mut lines = stdout.lines();

    assert_eq!(lines.next(), Some(HEADER));

    let mut rows = 0;

    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();

        assert_eq!(fields.len(), 8);

        let _: f64 = fields[1].parse()?;
        let _: f64 = fields[5].parse()?;
        let _: u32 = fields[6].parse()?;
        let label: u8 = fields[7].parse()?;

        assert!(label <= 1);
        rows += 1;
    }

    assert_eq!(rows, 6);

    Ok(())
}

#[test]
fn test_cli_outputs_correct_fraud_labels() -> Result<()> {
    let stdout = run_sample("sample.csv")?;
    let results = labels_by_account(&stdout);

    let label_of = |account: &str| results.get(account).cloned().ok_or_else(|| anyhow!("{account} missing from output"));

    assert_eq!(label_of("acc-legit")?, vec!["0"]);
    assert_eq!(label_of("acc-whale")?, vec!["1"]);
    assert_eq!(label_of("acc-burst")?, vec!["0", "1"]);
    assert_eq!(label_of("acc-negative")?, vec!["0"]);
    assert_eq!(label_of("acc-travel")?, vec!["0"]);

    Ok(())
}

#[test]
fn test_cli_clamps_negative_amounts() -> Result<()> {
    let stdout = run_sample("sample.csv")?;

    let row = stdout.lines()
        .find(|line| line.contains(",acc-negative,"))
        .ok_or_else(|| anyhow!("acc-negative missing from output"))?;
    let amount: f64 = row.split(',').nth(1).ok_or_else(|| anyhow!("amount column missing"))?.parse()?;

    assert_eq!(amount, 0.0);

    Ok(())
}

#[test]
fn test_cli_skips_malformed_rows() -> Result<()> {
    let stdout = run_sample("malformed.csv")?;
    let results = labels_by_account(&stdout);

    assert_eq!(results.len(), 2);
    assert!(results.contains_key("acc-good"));
    assert!(results.contains_key("acc-other"));

    Ok(())
}

#[test]
fn test_cli_handles_missing_input_file() -> Result<()> {
    let stdout = run_sample("does-not-exist.csv")?;

    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec![HEADER]);

    Ok(())
}

#[test]
fn test_cli_writes_amounts_exactly() -> Result<()> {
    let stdout = run_sample("sample.csv")?;

    let amount_of = |account: &str| -> Result<String> {
        let row = stdout.lines()
            .find(|line| line.contains(&format!(",{account},")))
            .ok_or_else(|| anyhow!("{account} missing from output"))?;
        Ok(row.split(',').nth(1).ok_or_else(|| anyhow!("amount column missing"))?.to_string())
    };

    assert_eq!(amount_of("acc-legit")?, "500.00");
    assert_eq!(amount_of("acc-whale")?, "2000000.00");

    Ok(())
}
