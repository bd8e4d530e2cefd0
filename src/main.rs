use clap::Parser;
use lucky_wheel::{
    SelectionPolicy, SpinController,
    angle::DEFAULT_EXTRA_TURNS,
    rng::{SeededRandom, ThreadRandom},
    store::{EntryStore, FileStorage},
    timer::{Clock, SystemClock},
    ui::{MainAction, TerminalDisplay, print_wheel, prompt_main_action, prompt_restock, prompt_settings, run_spin_animation},
};
use tracing_subscriber::EnvFilter;

const STORE_FILE: &str = "lucky_wheel.json";

#[derive(Parser, Debug)]
#[command(name = "lucky_wheel", about = "Spin a weighted lucky wheel in the terminal")]
struct Args {
    /// JSON file the wheel is saved in
    #[arg(long, default_value = STORE_FILE)]
    store: std::path::PathBuf,
    /// Delete the saved wheel and start from the default 1..10 list
    #[arg(long)]
    reset: bool,
    /// uniform, weighted or depleting
    #[arg(long, default_value = "weighted")]
    mode: SelectionPolicy,
    /// Seed for reproducible spins
    #[arg(long)]
    seed: Option<u64>,
    /// Full turns before the wheel settles (5-8)
    #[arg(long, default_value_t = DEFAULT_EXTRA_TURNS)]
    turns: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let storage = FileStorage::new(&args.store);
    if args.reset {
        storage.reset()?;
        println!("Saved wheel at {} removed.", storage.path().display());
    }
    let store = EntryStore::new(storage);
    let clock = SystemClock::new();
    let mut wheel = SpinController::new(store, TerminalDisplay::default())
        .with_policy(args.mode)
        .with_extra_turns(args.turns);
    wheel = match args.seed {
        Some(seed) => wheel.with_rng(SeededRandom::new(seed)),
        None => wheel.with_rng(ThreadRandom),
    };
    println!("Loaded {} items ({:?} mode) from {}", wheel.entries().len(), wheel.policy(), args.store.display());

    loop {
        match prompt_main_action() {
            MainAction::Spin => {
                let prior = wheel.rotation().cumulative_degrees;
                let Ok(ticket) = wheel.request_spin(clock.now()) else { continue };
                let labels: Vec<&str> = wheel.entries().iter().map(|e| e.label.as_str()).collect();
                run_spin_animation(&ticket, prior, &labels);
                while wheel.poll(clock.now()).is_none() {
                    std::thread::sleep(std::time::Duration::from_millis(20));
                }
            }
            MainAction::Wheel => print_wheel(wheel.entries()),
            MainAction::Settings => {
                if let Some(config) = prompt_settings(wheel.config()) {
                    if wheel.save_settings(config).is_ok() {
                        println!("✅ Settings saved.");
                    }
                } else {
                    println!("Settings unchanged.");
                }
            }
            MainAction::Restock => {
                if let Some((idx, weight)) = prompt_restock(wheel.entries()) {
                    let _ = wheel.replenish(idx, weight);
                }
            }
            MainAction::Exit => {
                println!("Exiting");
                break;
            }
        }
    }
    Ok(())
}
