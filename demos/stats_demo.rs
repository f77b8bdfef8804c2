use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use fib_hash::HashTable;
use fib_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "num_values", default_value_t = 1000)]
    num_values: usize,

    /// Hash values with their identity instead of SipHash.
    #[arg(long = "identity_hash")]
    identity_hash: bool,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();
    let hash = |value: u64| {
        if args.identity_hash {
            value
        } else {
            hash_u64(value)
        }
    };

    println!("Filling table with {} u64 values...", args.num_values);

    let mut table: HashTable<u64> = HashTable::new();
    let mut capacities = vec![table.capacity()];

    for i in 0..args.num_values {
        let value = i as u64;
        match table.entry(hash(value), |&v| v == value, |&v| hash(v)) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }

        if capacities.last() != Some(&table.capacity()) {
            capacities.push(table.capacity());
        }
    }

    println!("Inserted {} values into table", table.len());
    println!("Capacity steps: {:?}", capacities);
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.print_probe_histogram(|&v| hash(v));
    table.debug_stats(|&v| hash(v)).print();
}
