use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::StoreSnapshot;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Read every non-empty line of a JSONL file. A missing file reads as empty.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> io::Result<Vec<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut items = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(serde_json::from_str(&line)?);
    }
    Ok(items)
}

/// Flush a store snapshot to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 8 files:
/// - `entities.jsonl`: one Entity per line, NPC state inline
/// - `jobs.jsonl`: every job, any status
/// - `attacks.jsonl`: every attack record with its outcome
/// - `wars.jsonl`
/// - `relations.jsonl`: trust and cooldown per unordered pair
/// - `market.jsonl`: current supply per resource
/// - `intel.jsonl`
/// - `trades.jsonl`
pub fn flush_to_jsonl(snapshot: &StoreSnapshot, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join("entities.jsonl"), snapshot.entities.iter())?;
    write_jsonl(&output_dir.join("jobs.jsonl"), snapshot.jobs.iter())?;
    write_jsonl(&output_dir.join("attacks.jsonl"), snapshot.attacks.iter())?;
    write_jsonl(&output_dir.join("wars.jsonl"), snapshot.wars.iter())?;
    write_jsonl(&output_dir.join("relations.jsonl"), snapshot.relations.iter())?;
    write_jsonl(&output_dir.join("market.jsonl"), snapshot.market.iter())?;
    write_jsonl(&output_dir.join("intel.jsonl"), snapshot.intel.iter())?;
    write_jsonl(&output_dir.join("trades.jsonl"), snapshot.trades.iter())?;

    Ok(())
}

/// Read a snapshot written by [`flush_to_jsonl`].
pub fn load_from_jsonl(input_dir: &Path) -> io::Result<StoreSnapshot> {
    Ok(StoreSnapshot {
        entities: read_jsonl(&input_dir.join("entities.jsonl"))?,
        jobs: read_jsonl(&input_dir.join("jobs.jsonl"))?,
        attacks: read_jsonl(&input_dir.join("attacks.jsonl"))?,
        wars: read_jsonl(&input_dir.join("wars.jsonl"))?,
        relations: read_jsonl(&input_dir.join("relations.jsonl"))?,
        market: read_jsonl(&input_dir.join("market.jsonl"))?,
        intel: read_jsonl(&input_dir.join("intel.jsonl"))?,
        trades: read_jsonl(&input_dir.join("trades.jsonl"))?,
    })
}
