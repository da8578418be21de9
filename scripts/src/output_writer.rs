use std::{
    fmt::LowerHex,
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use json::JsonValue;

use crate::errors::ScriptError;

/// Where a value lives inside a deployment record
pub enum OutputKeys<'a> {
    /// Key related to a deployment
    Deployment { key: &'a str },
    /// Key related to a transaction of a contract
    Tx { key: &'a str, tx_key: &'a str },
}

/// Read a value from a deployment record
pub fn read_output_file(file_path: &Path, key: OutputKeys) -> Result<String, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(format!(
            "Deployment record {} not found",
            file_path.display()
        )));
    }

    // Parse it's json content into objects
    let parsed_json = get_json_from_file(file_path)?;
    let (value, label) = match key {
        OutputKeys::Deployment { key } => (&parsed_json[key]["deploy"], key.to_string()),
        OutputKeys::Tx { key, tx_key } => (&parsed_json[key]["txs"][tx_key], format!("{key}.{tx_key}")),
    };

    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ScriptError::JsonOutputError(format!("no value recorded for {label}")))
}

/// Writes the given value into a deployment record, creating it if needed
pub fn write_output_file<T: LowerHex>(
    file_path: &Path,
    key: OutputKeys,
    value: T,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        }
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    // Parse it's json content into objects
    let mut parsed_json = get_json_from_file(file_path)?;

    // Update the right key
    match key {
        OutputKeys::Deployment { key } => {
            parsed_json[key]["deploy"] = JsonValue::String(format!("{value:#x}"))
        }
        OutputKeys::Tx { key, tx_key } => {
            parsed_json[key]["txs"][tx_key] = JsonValue::String(format!("{value:#x}"))
        }
    };

    // Write the updated json back to the file
    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Path of the descriptor of `contract` inside `out_dir`
pub fn descriptor_path(out_dir: &Path, contract: &str) -> PathBuf {
    out_dir.join(format!("{contract}.json"))
}

/// Writes the abi and address of a deployed contract, for later interactions
pub fn write_contract_descriptor(
    out_dir: &Path,
    contract: &str,
    abi: &JsonValue,
    address: Address,
) -> Result<PathBuf, ScriptError> {
    fs::create_dir_all(out_dir).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    let mut descriptor = JsonValue::new_object();
    descriptor["contractName"] = contract.into();
    descriptor["abi"] = abi.clone();
    descriptor["address"] = address.to_checksum(None).into();
    let path = descriptor_path(out_dir, contract);
    fs::write(&path, json::stringify_pretty(descriptor, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(path)
}

/// Reads back a descriptor written by [`write_contract_descriptor`]
pub fn read_contract_descriptor(path: &Path) -> Result<(JsonValue, Address), ScriptError> {
    let mut parsed_json = get_json_from_file(path)?;

    let address = parsed_json["address"]
        .as_str()
        .ok_or_else(|| {
            ScriptError::JsonOutputError(format!("{}: missing address", path.display()))
        })?
        .parse::<Address>()
        .map_err(|e| ScriptError::JsonOutputError(format!("{}: {}", path.display(), e)))?;

    let abi = parsed_json.remove("abi");
    if !abi.is_array() {
        return Err(ScriptError::JsonOutputError(format!(
            "{}: missing abi",
            path.display()
        )));
    }

    Ok((abi, address))
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
