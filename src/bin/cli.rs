use chrono::{Local, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use study_pacer::{
    ApplyOutcome, DeckConfigStore, DeckNode, JsonDeckStore, LimitUpdate, PlanForm, PlanMode,
    PlanResult, PlannerConfig, SchedulePlanner, apply_limit_with_confirmation, flatten_tree,
    load_plan_from_json, save_plan_to_json, save_schedule_to_csv,
};
use tracing_subscriber::EnvFilter;

const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
            .map(|d| d.format("%Y-%m-%d (%a)").to_string())
            .unwrap_or_else(|| days.to_string()),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current inputs\n  mode <rate|date>                   Calculate daily rate or end date\n  total <n>                          Total items to study (1-999999)\n  duration <days>                    Target duration in days (1-9999)\n  rate <n>                           Items per day (1-9999)\n  start <YYYY-MM-DD>                 Start date\n  weekends <on|off>                  Study on weekends\n  verbose <on|off>                   Include the daily schedule\n  plan                               Compute the plan\n  table                              Show the last daily schedule as a table\n  export <csv|json> <path>           Save the last schedule (csv) or plan (json)\n  import json <path>                 Load a saved plan\n  decks load <json_path>             Load deck options from a JSON file\n  decks list                         List loaded decks\n  deck <id>                          Select the target deck\n  apply                              Apply the last computed rate to the selected deck\n  quit|exit                          Exit"
    );
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn print_form(form: &PlanForm) {
    let mode = match form.mode {
        PlanMode::RateFromDuration => "calculate daily rate",
        PlanMode::DurationFromRate => "calculate end date",
    };
    println!("Mode               : {}", mode);
    println!("Total items        : {}", form.total_items());
    match form.mode {
        PlanMode::RateFromDuration => println!("Duration (days)    : {}", form.duration_days()),
        PlanMode::DurationFromRate => println!("Items per day      : {}", form.rate_per_day()),
    }
    println!("Start date         : {}", form.start_date);
    println!("Study on weekends  : {}", on_off(form.include_weekends));
    println!("Daily schedule     : {}", on_off(form.verbose));
    if form.can_apply_to_deck() {
        match form.deck_id {
            Some(id) => println!("Target deck        : {}", id),
            None => println!("Target deck        : (none)"),
        }
    }
}

fn parse_number(value: Option<&str>, what: &str) -> Option<u32> {
    match value.map(str::parse::<u32>) {
        Some(Ok(n)) => Some(n),
        _ => {
            println!("Usage: {} <positive integer>", what);
            None
        }
    }
}

fn read_line(stdin: &io::Stdin, line: &mut String) -> bool {
    line.clear();
    matches!(stdin.lock().read_line(line), Ok(n) if n > 0)
}

fn load_config() -> PlannerConfig {
    match std::env::var("STUDY_PACER_CONFIG") {
        Ok(path) => match PlannerConfig::load_json(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Ignoring config {}: {}", path, err);
                PlannerConfig::default()
            }
        },
        Err(_) => PlannerConfig::default(),
    }
}

fn run_plan(planner: &SchedulePlanner, form: &PlanForm) -> Option<PlanResult> {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(err) => {
            println!("Error: {}", err.message());
            return None;
        }
    };
    match planner.plan(&request) {
        Ok(result) => {
            print!("{}", result.to_report());
            Some(result)
        }
        Err(err) => {
            println!("Error: {}\n\nPlease check your inputs.", err.message());
            None
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_config();
    let planner = config.planner();
    let mut form = PlanForm::new(&config.defaults, Local::now().date_naive());
    let mut last_result: Option<PlanResult> = None;
    let mut decks: Option<JsonDeckStore> = None;

    println!("Study Pacer (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        if !read_line(&stdin, &mut line) {
            break;
        }
        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        match cmd {
            "help" => print_help(),
            "show" => print_form(&form),
            "mode" => match parts.next().map(PlanMode::from_str) {
                Some(Ok(mode)) => {
                    form.mode = mode;
                    last_result = None;
                    println!("Mode set to {}.", mode);
                }
                _ => println!("Usage: mode <rate|date>"),
            },
            "total" => {
                if let Some(n) = parse_number(parts.next(), "total") {
                    match form.set_total_items(n) {
                        Ok(()) => {
                            last_result = None;
                            println!("Total items set to {}.", n);
                        }
                        Err(err) => println!("Error: {}", err.message()),
                    }
                }
            }
            "duration" => {
                if let Some(n) = parse_number(parts.next(), "duration") {
                    match form.set_duration_days(n) {
                        Ok(()) => {
                            last_result = None;
                            println!("Duration set to {} days.", n);
                        }
                        Err(err) => println!("Error: {}", err.message()),
                    }
                }
            }
            "rate" => {
                if let Some(n) = parse_number(parts.next(), "rate") {
                    match form.set_rate_per_day(n) {
                        Ok(()) => {
                            last_result = None;
                            println!("Rate set to {} items/day.", n);
                        }
                        Err(err) => println!("Error: {}", err.message()),
                    }
                }
            }
            "start" => match parts
                .next()
                .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            {
                Some(Ok(date)) => {
                    form.start_date = date;
                    last_result = None;
                    println!("Start date set to {}.", date);
                }
                _ => println!("Usage: start <YYYY-MM-DD>"),
            },
            "weekends" => match parts.next().and_then(parse_on_off) {
                Some(value) => {
                    form.include_weekends = value;
                    last_result = None;
                    println!("Study on weekends: {}.", on_off(value));
                }
                None => println!("Usage: weekends <on|off>"),
            },
            "verbose" => match parts.next().and_then(parse_on_off) {
                Some(value) => {
                    form.verbose = value;
                    last_result = None;
                    println!("Daily schedule: {}.", on_off(value));
                }
                None => println!("Usage: verbose <on|off>"),
            },
            "plan" => {
                last_result = run_plan(&planner, &form);
            }
            "table" => match last_result.as_ref().and_then(|r| r.schedule.as_ref()) {
                Some(schedule) => match schedule.to_dataframe() {
                    Ok(df) => println!("{}", render_df_as_text_table(&df)),
                    Err(err) => println!("Error: {}", err),
                },
                None => println!("No daily schedule. Turn verbose on and run 'plan'."),
            },
            "export" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path, last_result.as_ref()) {
                    (_, _, None) => println!("Run 'plan' first."),
                    (Some("csv"), Some(path), Some(result)) => match result.schedule.as_ref() {
                        Some(schedule) => match save_schedule_to_csv(schedule, path) {
                            Ok(()) => println!("Schedule saved to {}.", path),
                            Err(err) => println!("Error: {}", err),
                        },
                        None => println!("No daily schedule. Turn verbose on and run 'plan'."),
                    },
                    (Some("json"), Some(path), Some(result)) => {
                        match save_plan_to_json(result, path) {
                            Ok(()) => println!("Plan saved to {}.", path),
                            Err(err) => println!("Error: {}", err),
                        }
                    }
                    _ => println!("Usage: export <csv|json> <path>"),
                }
            }
            "import" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_plan_from_json(path) {
                    Ok(result) => {
                        println!("Plan loaded from {}.", path);
                        print!("{}", result.to_report());
                        last_result = Some(result);
                    }
                    Err(err) => println!("Error: {}", err),
                },
                _ => println!("Usage: import json <path>"),
            },
            "decks" => match (parts.next(), parts.next()) {
                (Some("load"), Some(path)) => match JsonDeckStore::open(path) {
                    Ok(store) => {
                        let count = store.list_decks().map(|d| d.len()).unwrap_or(0);
                        println!("Loaded {} decks from {}.", count, path);
                        decks = Some(store);
                    }
                    Err(err) => println!("Error: {}", err),
                },
                (Some("list"), None) => match decks.as_ref() {
                    Some(store) => match store.list_decks() {
                        Ok(records) => {
                            let tree = DeckNode::build_tree(&records);
                            for entry in flatten_tree(&tree) {
                                println!("{:>6}  {}", entry.id, entry.label());
                            }
                        }
                        Err(err) => println!("Error: {}", err),
                    },
                    None => println!("No deck file loaded. Use 'decks load <path>'."),
                },
                _ => println!("Usage: decks load <json_path> | decks list"),
            },
            "deck" => match parts.next().map(str::parse::<i64>) {
                Some(Ok(id)) => {
                    form.deck_id = Some(id);
                    println!("Target deck set to {}.", id);
                }
                _ => println!("Usage: deck <id>"),
            },
            "apply" => {
                let Some(result) = last_result.as_ref() else {
                    println!("Run 'plan' first.");
                    continue;
                };
                let Some(deck_id) = form.deck_id else {
                    println!("No deck selected. Cannot apply settings.");
                    continue;
                };
                let Some(update) = LimitUpdate::from_result(result, deck_id) else {
                    println!("Only a calculated daily rate can be applied to a deck.");
                    continue;
                };
                let Some(store) = decks.as_ref() else {
                    println!("No deck file loaded. Use 'decks load <path>'.");
                    continue;
                };
                let outcome = apply_limit_with_confirmation(store, update, |deck, new_limit| {
                    print!(
                        "Are you sure you want to change the daily new-item limit for deck '{}' to {}? [y/N] ",
                        deck.name, new_limit
                    );
                    let _ = io::stdout().flush();
                    let mut answer = String::new();
                    read_line(&stdin, &mut answer);
                    println!();
                    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
                });
                match outcome {
                    Ok(ApplyOutcome::Applied { previous, current }) => println!(
                        "Set daily new-item limit for deck {} to {} (was {}).",
                        deck_id, current, previous
                    ),
                    Ok(ApplyOutcome::Declined) => println!("Deck update cancelled."),
                    Err(err) => println!("Could not update deck settings: {}", err),
                }
            }
            "quit" | "exit" => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
