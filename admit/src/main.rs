mod args;

use args::{Args, parse_args};
use overlay_core::{info, log::init_logger};
use overlay_topics::{AdmissionConfig, AdmissionReport, TopicManager, TopicRegistry};
use serde_json::{Value, json};
use std::{error::Error, fs};

fn decode_hex(hex: &str) -> Result<Vec<u8>, String> {
    let hex = hex.trim();
    let mut bytes = vec![0u8; hex.len() / 2];
    faster_hex::hex_decode(hex.as_bytes(), &mut bytes).map_err(|err| format!("invalid envelope hex: {err:?}"))?;
    Ok(bytes)
}

fn read_envelope(args: &Args) -> Result<Vec<u8>, Box<dyn Error>> {
    if let Some(hex) = args.envelope.as_deref() {
        return Ok(decode_hex(hex)?);
    }
    let Some(path) = args.envelope_file.as_deref() else {
        return Err("either --envelope or --envelope-file is required".into());
    };
    let content = fs::read(path)?;
    // Files written by hand or by other tools often hold the hex form.
    match std::str::from_utf8(&content).ok().map(decode_hex) {
        Some(Ok(bytes)) => Ok(bytes),
        _ => Ok(content),
    }
}

fn report_json(topic: &str, report: &AdmissionReport) -> Value {
    json!({
        "topic": topic,
        "outputsToAdmit": report.instructions.outputs_to_admit,
        "coinsToRetain": report.instructions.coins_to_retain,
        "admitted": report.admitted.iter().map(|output| json!({ "index": output.index, "payload": output.payload })).collect::<Vec<_>>(),
        "rejected": report.rejected.iter().map(|rejection| json!({ "index": rejection.index, "reason": rejection.error.to_string() })).collect::<Vec<_>>(),
        "skippedCoins": report.skipped_coins.iter().map(|skipped| json!({ "index": skipped.index, "reason": skipped.error.to_string() })).collect::<Vec<_>>(),
        "parseError": report.parse_error.as_ref().map(ToString::to_string),
    })
}

fn describe_json(manager: &dyn TopicManager) -> Value {
    json!({
        "topic": manager.topic(),
        "metadata": manager.metadata(),
        "documentation": manager.documentation(),
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    init_logger(args.logdir.as_deref(), &args.log_level)?;

    let config = match args.config_file.as_deref() {
        Some(path) => AdmissionConfig::load(path)?,
        None => AdmissionConfig::default(),
    };
    let registry = TopicRegistry::from_config(&config)?;
    let manager = registry.get(&args.topic).ok_or_else(|| format!("topic {} is not enabled", args.topic))?;

    let output = if args.describe {
        describe_json(manager)
    } else {
        let envelope = read_envelope(&args)?;
        info!("Evaluating a {} byte envelope for {}", envelope.len(), manager.topic());
        report_json(manager.topic(), &manager.evaluate(&envelope, &args.previous_coins))
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn main() {
    let args = parse_args();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
