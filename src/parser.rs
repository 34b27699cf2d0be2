//! Parse console lines into input edits.
//! Supported: `buy|sell|amount|fee <n>`, `mode <m>`, `reset`, `analyze [label]`,
//! `show`, `help`, `quit`.

use crate::types::{Edit, Mode};
use crate::utils::parse_number;
use regex::Regex;
use std::sync::OnceLock;

fn re_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "buy 120", "sell=95.5", "fee: 0.2"
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(buy|sell|amount|amt|fee)(?:\s*[:=]\s*|\s+|$)(\S*)$").expect("valid field regex")
    })
}

fn re_mode() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^mode\s+(\S+)$").expect("valid mode regex"))
}

fn re_analyze() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:analyze|insight)(?:\s+(.+))?$").expect("valid analyze regex"))
}

pub fn parse_mode(s: &str) -> Option<Mode> {
    match s.to_ascii_lowercase().as_str() {
        "investment" | "inv" | "usd" | "$" => Some(Mode::Investment),
        "quantity" | "qty" | "units" | "#" => Some(Mode::Quantity),
        _ => None,
    }
}

pub fn parse_edit(text: &str) -> Option<Edit> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    if let Some(c) = re_field().captures(t) {
        let v = parse_number(&c[2]);
        return match c[1].to_ascii_lowercase().as_str() {
            "buy" => Some(Edit::BuyPrice(v)),
            "sell" => Some(Edit::SellPrice(v)),
            "amount" | "amt" => Some(Edit::Amount(v)),
            "fee" => Some(Edit::FeePercentage(v)),
            _ => None,
        };
    }

    if let Some(c) = re_mode().captures(t) {
        return parse_mode(&c[1]).map(Edit::Mode);
    }

    if let Some(c) = re_analyze().captures(t) {
        let label = c.get(1).map(|m| m.as_str().trim().to_string());
        return Some(Edit::Analyze { label });
    }

    match t.to_ascii_lowercase().as_str() {
        "reset" => Some(Edit::Reset),
        "show" | "s" => Some(Edit::Show),
        "help" | "?" => Some(Edit::Help),
        "quit" | "exit" | "q" => Some(Edit::Quit),
        _ => None,
    }
}

pub const HELP: &str = "\
commands:
  buy <price>        set entry price per unit
  sell <price>       set exit price per unit
  amount <n>         capital (investment mode) or units (quantity mode)
  fee <percent>      fee charged on entry and exit, e.g. 0.1
  mode investment|quantity
  reset              restore defaults
  analyze [label]    request a narrative insight for the current result
  show | help | quit";
