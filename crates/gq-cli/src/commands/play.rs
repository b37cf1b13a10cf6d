use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use gq_core::{DEFAULT_CHOICES, FileStore, GameEngine, GameMode, QuizError, Verdict};

/// Overrides given on the command line; each one is saved like a settings change.
pub struct PlayOptions {
    pub mode: Option<GameMode>,
    pub attempts: Option<u32>,
    pub targets: Option<usize>,
    pub seed: Option<u64>,
}

pub fn run(data_dir: Option<&Path>, options: PlayOptions) -> Result<(), String> {
    let store = super::open_store(data_dir)?;
    let pool = super::load_pool()?;
    let mut engine = match options.seed {
        Some(seed) => GameEngine::seeded(pool, store, seed),
        None => GameEngine::new(pool, store),
    };

    if let Some(mode) = options.mode {
        engine.change_mode(mode).map_err(|e| e.to_string())?;
    }
    if let Some(attempts) = options.attempts {
        engine
            .change_max_attempts(attempts)
            .map_err(|e| e.to_string())?;
    }
    if let Some(targets) = options.targets {
        engine
            .change_subset_size(targets)
            .map_err(|e| e.to_string())?;
    }

    let mode = engine.session().mode();
    println!(
        "  {} {} départements, mode {mode}, {} attempt(s) each",
        "Starting".bold(),
        engine.stats().total,
        engine.session().max_attempts()
    );
    println!("  {}", instructions(mode));
    println!("  Type '? <text>' for suggestions, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    while let Some(question) = prompt(&engine) {
        let choices: Vec<String> = if mode == GameMode::PickFromChoices {
            engine
                .choices(DEFAULT_CHOICES)
                .into_iter()
                .map(|r| r.code.clone())
                .collect()
        } else {
            Vec::new()
        };
        for (i, code) in choices.iter().enumerate() {
            if let Some(region) = engine.session().region(code) {
                println!("    {}. {}", i + 1, region.name);
            }
        }

        print!("{question} > ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }
        if let Some(partial) = input.strip_prefix('?') {
            print_suggestions(&engine, partial);
            continue;
        }

        let result = match mode {
            GameMode::PointOnMap => engine.submit_guess(&input.to_uppercase()),
            GameMode::TypeName if engine.pool().get(&input.to_uppercase()).is_some() => {
                println!("  {}\n", "Type the name, not the code.".yellow());
                continue;
            }
            GameMode::TypeName => engine.guess_by_name(input),
            GameMode::PickFromChoices => match pick(&choices, input) {
                Some(code) => engine.submit_guess(code),
                None => {
                    println!(
                        "  {}\n",
                        format!("Pick a number between 1 and {}.", choices.len()).yellow()
                    );
                    continue;
                }
            },
        };

        match result {
            Ok(verdict) => print_verdict(&engine, &verdict),
            Err(QuizError::UnknownRegion(text)) => {
                println!("  {}\n", format!("No département matches '{text}'.").yellow());
            }
            Err(e) => println!("  {}\n", e.to_string().yellow()),
        }
    }

    if engine.session().is_complete() {
        let stats = engine.stats();
        println!(
            "  {} {}",
            "Finished:".bold(),
            stats.summary(engine.session().max_attempts())
        );
        if engine.is_recorded() {
            println!("  Session recorded in history.");
        } else {
            println!("  {}", "Session could not be saved to history.".yellow());
        }
    } else {
        let stats = engine.stats();
        println!("  Stopped after {}/{}.", stats.seen, stats.total);
    }

    Ok(())
}

fn instructions(mode: GameMode) -> &'static str {
    match mode {
        GameMode::PointOnMap => "Enter the code of each département named.",
        GameMode::TypeName => "Enter the name of each département code shown.",
        GameMode::PickFromChoices => "Pick the name matching each code shown.",
    }
}

/// Question for the current target, `None` once the session is over.
fn prompt(engine: &GameEngine<FileStore>) -> Option<String> {
    let target = engine.target()?;
    let stats = engine.stats();
    let session = engine.session();
    let question = match session.mode() {
        GameMode::PointOnMap => format!("Where is {}?", target.name.bold()),
        GameMode::TypeName | GameMode::PickFromChoices => {
            format!("Which département is {}?", target.code.bold())
        }
    };
    Some(format!(
        "  [{}/{}] {question} (attempt {}/{})",
        stats.seen + 1,
        stats.total,
        session.attempt_count(),
        session.max_attempts()
    ))
}

fn pick<'a>(options: &'a [String], input: &str) -> Option<&'a str> {
    let n: usize = input.parse().ok()?;
    options.get(n.checked_sub(1)?).map(String::as_str)
}

fn print_verdict(engine: &GameEngine<FileStore>, verdict: &Verdict) {
    match verdict {
        Verdict::Retry { attempts_left } => {
            let guessed = engine
                .session()
                .flagged_guess()
                .map(|r| engine.label(r))
                .unwrap_or_default();
            println!(
                "  {} {} attempt(s) left.\n",
                format!("No, that is {guessed}.").yellow(),
                attempts_left
            );
        }
        Verdict::Correct { code, attempt } => {
            let label = label_for(engine, code);
            println!(
                "  {}\n",
                format!("Correct: {label} (attempt {attempt})").green()
            );
        }
        Verdict::Revealed { answer } => {
            let label = label_for(engine, answer);
            println!("  {}\n", format!("Missed: it was {label}.").red());
        }
    }
}

fn label_for(engine: &GameEngine<FileStore>, code: &str) -> String {
    engine
        .session()
        .region(code)
        .map(|r| engine.label(r))
        .unwrap_or_else(|| code.to_string())
}

fn print_suggestions(engine: &GameEngine<FileStore>, partial: &str) {
    let suggestions = engine.suggestions(partial, 8);
    if suggestions.is_empty() {
        println!("  No suggestions.\n");
        return;
    }
    let names: Vec<&str> = suggestions.iter().map(|r| r.name.as_str()).collect();
    println!("  {}\n", names.join(", "));
}
