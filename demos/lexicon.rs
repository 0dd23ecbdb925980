//! Example: building a Lexicon wrapper around a double array.
//!
//! This shows how to pair the ranks returned by the double array with
//! payloads kept by the caller. The `Lexicon` struct reads tab-separated
//! `key\tvalue` records, sorts them by key, and answers lookups and
//! longest-match segmentation by rank.
//!
//! Run with: cargo run --example lexicon [FILE]
//!
//! Without a file argument a small built-in phrase table is used.

use std::error::Error;
use std::fs;
use std::process;

use libdarts::darts::Builder;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const PHRASES: &str = "\
系一片\t繫一片
印度尼西亚\t印度尼西亞
印度\t印度
以色列\t以色列
巴勒斯坦\t巴勒斯坦
malformed line without a tab
一丝不挂\t一絲不掛
一丝\t一絲
";

struct Entry {
    key: String,
    value: String,
}

/// A rank-indexed table of entries with a double array over their keys.
struct Lexicon {
    entries: Vec<Entry>,
    index: Builder,
}

impl Lexicon {
    /// Parses `key\tvalue` lines, skipping lines that are not exactly two fields.
    fn parse(text: &str) -> Result<Self, Box<dyn Error>> {
        let mut entries: Vec<Entry> = text
            .lines()
            .filter_map(|line| {
                let mut fields = line.trim().split('\t');
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(key), Some(value), None) => Some(Entry {
                        key: key.to_string(),
                        value: value.to_string(),
                    }),
                    _ => None,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries.dedup_by(|a, b| a.key == b.key);

        let mut index = Builder::new();
        index.build(entries.iter().map(|e| &e.key))?;
        Ok(Lexicon { entries, index })
    }

    /// Returns the value stored for `key`.
    fn get(&self, key: &str) -> Option<&str> {
        let rank = self.index.exact_match_search(key)?;
        Some(&self.entries[rank].value)
    }

    /// Converts `text` by replacing the longest known key at each position.
    fn convert(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(ch) = rest.chars().next() {
            match self.index.common_prefix_iter(rest).last() {
                Some(m) if m.len > 0 => {
                    out.push_str(&self.entries[m.rank].value);
                    rest = &rest[m.len..];
                }
                _ => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        out
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let text = match std::env::args().nth(1) {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("can't open {path}: {e}");
                process::exit(1);
            }
        },
        None => PHRASES.to_string(),
    };

    let lexicon = match Lexicon::parse(&text) {
        Ok(lexicon) => lexicon,
        Err(e) => {
            eprintln!("can't build lexicon: {e}");
            process::exit(1);
        }
    };

    println!("Lookup:");
    for key in ["系一片", "印度", "印", "日本"] {
        match lexicon.get(key) {
            Some(value) => println!("  key: {key}, value: {value}"),
            None => println!("  key: {key}, not found"),
        }
    }

    println!("\nConversion:");
    for text in ["印度尼西亚和以色列", "一丝不挂的一丝"] {
        println!("  {text} -> {}", lexicon.convert(text));
    }

    let bytes = lexicon.index.to_bytes();
    println!(
        "\nIndex: {} keys, {} slots, {} bytes serialized",
        lexicon.entries.len(),
        lexicon.index.automaton().size(),
        bytes.len()
    );
}
