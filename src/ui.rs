use std::io::{self, Write};
use std::time::Duration;

use dialoguer::{Input, Select};

use crate::WheelError;
use crate::angle::index_under_pointer;
use crate::entry::{Entry, WheelConfig, format_entries, parse_entries, total_weight};
use crate::spin::{SpinTicket, WheelDisplay};

#[derive(Debug, Clone, Copy)]
pub enum MainAction {
    Spin,
    Wheel,
    Settings,
    Restock,
    Exit,
}

pub fn prompt_main_action() -> MainAction {
    println!("\n===== Lucky Wheel =====");
    println!("[S]pin  [W]heel  S[e]ttings  [R]estock  E[x]it / [Q]uit");
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return MainAction::Exit;
    }
    let Some(first) = line.trim().chars().next() else { return MainAction::Spin };
    match first.to_ascii_lowercase() {
        's' => MainAction::Spin,
        'w' => MainAction::Wheel,
        'e' => MainAction::Settings,
        'r' => MainAction::Restock,
        'x' | 'q' => MainAction::Exit,
        other => {
            println!("Unrecognized option '{}'. (S/W/E/R/Q)", other);
            MainAction::Wheel
        }
    }
}

pub fn print_simple_header(title: &str) {
    println!("\n──── {} ────", title);
}

pub fn print_wheel(entries: &[Entry]) {
    print_simple_header("Wheel");
    if entries.is_empty() {
        println!("The wheel is empty.");
        return;
    }
    let total = total_weight(entries);
    for (i, e) in entries.iter().enumerate() {
        let share = if total == 0 { 0.0 } else { e.weight as f64 * 100.0 / total as f64 };
        let marker = if e.is_eligible() { "•" } else { "✗" };
        println!("  {} {:>2}. {:<24} weight {:>3}  ({:>5.1}%)", marker, i + 1, e.label, e.weight, share);
    }
    if total == 0 {
        println!("⚠️  Every item is out of stock.");
    }
}

/// Prints to stdout. The animation itself is driven by `run_spin_animation`.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl WheelDisplay for TerminalDisplay {
    fn animate_rotation(&mut self, _degrees: f64, duration: Duration) {
        println!("🎡 The wheel spins for {}s...", duration.as_secs());
    }

    fn show_result(&mut self, label: &str) {
        print_simple_header("Result");
        println!("🎉 The wheel stops on: {}", label);
    }

    fn redraw(&mut self, entries: &[Entry]) {
        print_wheel(entries);
    }

    fn notify(&mut self, error: &WheelError) {
        match error {
            WheelError::Depleted => println!("⚠️  No eligible items left. Restock the wheel first."),
            other => println!("⚠️  {}", other),
        }
    }
}

/// Show the segment passing under the pointer while the spin runs, eased out like the
/// browser's cubic-bezier transition.
pub fn run_spin_animation(ticket: &SpinTicket, prior_degrees: f64, labels: &[&str]) {
    const FRAME: Duration = Duration::from_millis(120);
    let total = Duration::from_secs(u64::from(ticket.duration_secs));
    let frames = (total.as_millis() / FRAME.as_millis()).max(1) as u32;
    for f in 1..=frames {
        let t = f64::from(f) / f64::from(frames);
        let eased = 1.0 - (1.0 - t).powi(3);
        let angle = prior_degrees + (ticket.target_degrees - prior_degrees) * eased;
        let idx = index_under_pointer(angle, labels.len());
        print!("\r  ▶ {:<24}", labels.get(idx).copied().unwrap_or(""));
        let _ = io::stdout().flush();
        std::thread::sleep(FRAME);
    }
    println!();
}

/// Items typed in the settings prompt, or the current ones when nothing was typed.
pub fn settings_entries(typed: &[String], current: &[Entry]) -> Vec<Entry> {
    if typed.iter().all(|l| l.trim().is_empty()) {
        return current.to_vec();
    }
    parse_entries(&typed.join("\n"))
}

/// Ask for new items and duration, prefilled from `current`. `None` when the user backs out.
pub fn prompt_settings(current: &WheelConfig) -> Option<WheelConfig> {
    print_simple_header("Settings");
    println!("Current items:\n{}", format_entries(&current.entries));
    println!("Enter one item per line (\"label\" or \"label: weight\"). Empty line to finish;");
    println!("an empty first line keeps the current items.");
    let mut lines = Vec::new();
    loop {
        let line: String = Input::new()
            .with_prompt(format!("Item {}", lines.len() + 1))
            .allow_empty(true)
            .interact_text()
            .ok()?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    let duration: u32 = Input::new()
        .with_prompt("Spin duration (seconds)")
        .default(current.spin_duration_secs)
        .interact_text()
        .ok()?;
    Some(WheelConfig::new(settings_entries(&lines, &current.entries), duration))
}

/// Pick an item and its new weight.
pub fn prompt_restock(entries: &[Entry]) -> Option<(usize, u32)> {
    if entries.is_empty() {
        println!("Nothing to restock.");
        return None;
    }
    let display: Vec<String> = entries.iter().map(|e| format!("{} (weight {})", e.label, e.weight)).collect();
    let idx = Select::new().with_prompt("Restock which item?").items(&display).default(0).interact().ok()?;
    let weight: u32 = Input::new()
        .with_prompt("New weight")
        .default(entries[idx].weight.max(1))
        .interact_text()
        .ok()?;
    Some((idx, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_keep_current_items() {
        let current = vec![Entry::new("A", 2), Entry::unit("B")];
        assert_eq!(settings_entries(&[], &current), current);
        assert_eq!(settings_entries(&["  ".to_string()], &current), current);
    }

    #[test]
    fn typed_settings_replace_items() {
        let current = vec![Entry::unit("A"), Entry::unit("B")];
        let typed = vec!["X: 3".to_string(), "Y".to_string()];
        assert_eq!(settings_entries(&typed, &current), vec![Entry::new("X", 3), Entry::unit("Y")]);
    }
}
