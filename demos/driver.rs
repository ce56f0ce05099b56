//! Walkthrough of the table's mechanics: growth from two buckets, lookups,
//! and removals of present and absent keys.
//!
//! Run with `RUST_LOG=chain_hashtable=debug cargo run --example driver` to
//! see the library's own resize and miss records.

use chain_hashtable::{HashTable, TableError};
use env_logger::Builder;
use log::{info, warn, LevelFilter};

fn initialize_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("chain_hashtable", LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env();
    // Avoid panicking if a logger is already installed.
    let _ = builder.try_init();
}

fn report(table: &HashTable<&str>, key: &str) {
    match table.retrieve(key) {
        Some(v) => info!("{} => {}", key, v),
        None => info!("{} => (not found)", key),
    }
}

fn remove(table: &mut HashTable<&str>, key: &str) {
    match table.remove(key) {
        Some(_) => info!("key: {} was successfully removed!", key),
        None => warn!("key: {} does not exist in storage!", key),
    }
}

fn dump(table: &HashTable<&str>) {
    for bucket in 0..table.capacity() {
        let chain: Vec<String> = table
            .chain(bucket)
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        info!("  [{}] {}", bucket, chain.join(" -> "));
    }
}

fn main() -> Result<(), TableError> {
    initialize_logger();

    let mut table = HashTable::new(2)?;
    table.insert("line_1", "Tiny hash table");
    table.insert("line_2", "Filled beyond capacity");
    info!("capacity {} holding {}", table.capacity(), table.len());

    table.insert("line_3", "Linked list saves the day!");
    info!(
        "capacity {} holding {} (load factor {:.2})",
        table.capacity(),
        table.len(),
        table.load_factor()
    );
    dump(&table);

    for key in ["line_1", "line_2", "line_3"] {
        report(&table, key);
    }

    remove(&mut table, "line_2");
    remove(&mut table, "line_2");
    report(&table, "line_2");
    dump(&table);

    Ok(())
}
