// src/operator_client.rs
// Operator terminal client for Alfarha bingo.
//
// Subcommands:
// - balance:  show the shop balance
// - start:    show the selection summary and start a round with the chosen cards
// - results:  show winning or failed cards against the called numbers, with optional locking
// - generate: write a card catalog to a JSON file
// - check:    evaluate one card against called numbers and a winning pattern

use clap::{Args, Parser, Subcommand};

use alfarha::api::ApiClient;
use alfarha::called::CalledNumbers;
use alfarha::card::{CardCatalog, CardGenerator};
use alfarha::config::ClientConfig;
use alfarha::defs::{CardId, Colors, TOTAL_CARDS};
use alfarha::error::{ClientError, Result};
use alfarha::logging::{log_error, log_info};
use alfarha::notify::{Notifier, SilentNotifier, TerminalNotifier};
use alfarha::pattern::{self, WinningPattern};
use alfarha::results::{self, ResultStatus, ResultsView};
use alfarha::session::Session;
use alfarha::settings::{CallInterval, CardSelection, Commission, GameSettings, Language, DEFAULT_BET};
use alfarha::terminal::{self, KeyAction};

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Alfarha Bingo Operator - Start rounds and check cards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Shop id to use instead of the one in the configuration
    #[arg(long, global = true)]
    shop_id: Option<String>,

    /// API base URL to use instead of the one in the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Card catalog JSON file to use instead of the generated one
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Do not announce results
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the shop balance
    Balance,
    /// Start a round with the selected cards
    Start(StartArgs),
    /// Show winning or failed cards
    Results(ResultsArgs),
    /// Write a card catalog to a JSON file
    Generate(GenerateArgs),
    /// Evaluate one card against the called numbers
    Check(CheckArgs),
}

#[derive(Args)]
struct StartArgs {
    /// Comma separated card numbers (1-200)
    #[arg(long, value_delimiter = ',', required = true)]
    cards: Vec<CardId>,

    #[arg(long, default_value_t = DEFAULT_BET)]
    bet: u64,

    /// 20% or 30%
    #[arg(long, default_value = "30%")]
    commission: Commission,

    /// 4, 5 or 7 seconds between calls
    #[arg(long, default_value = "4 sec")]
    interval: CallInterval,

    #[arg(long, default_value = "All")]
    pattern: WinningPattern,

    #[arg(long, default_value = "Arabic")]
    language: Language,
}

#[derive(Args)]
struct ResultsArgs {
    /// Called numbers, comma or space separated
    #[arg(long, default_value = "")]
    called: String,

    /// Winning card ids
    #[arg(long, value_delimiter = ',')]
    winners: Vec<CardId>,

    /// Failed card ids
    #[arg(long, value_delimiter = ',')]
    failed: Vec<CardId>,

    /// won or failed
    #[arg(long, default_value = "won")]
    status: ResultStatus,

    #[arg(long, default_value = "Arabic")]
    language: Language,

    /// Ask for L (lock) on each failed card
    #[arg(long)]
    interactive: bool,

    /// Print without colours
    #[arg(long)]
    plain: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Output JSON file
    #[arg(long)]
    output: String,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = TOTAL_CARDS)]
    count: CardId,
}

#[derive(Args)]
struct CheckArgs {
    /// Card id to check
    #[arg(long)]
    card: CardId,

    /// Called numbers, comma or space separated
    #[arg(long)]
    called: String,

    #[arg(long, default_value = "All")]
    pattern: WinningPattern,
}

fn parse_called(input: &str) -> Result<CalledNumbers> {
    CalledNumbers::parse_list(input).map_err(|value| ClientError::InvalidSetting { key: "called", value })
}

fn load_catalog(config: &ClientConfig, path: Option<&str>) -> Result<CardCatalog> {
    match path.or(config.catalog.as_deref()) {
        Some(path) => {
            let catalog = CardCatalog::load(path)?;
            log_info(&format!("Loaded {} cards from {path}", catalog.len()));
            Ok(catalog)
        }
        None => Ok(CardCatalog::standard(config.catalog_seed)),
    }
}

async fn show_balance(client: &ApiClient, session: &Session) -> Result<()> {
    let balance = client.fetch_balance(session).await?;
    println!("Balance: {}{balance:.2}{}", Colors::green(), Colors::reset());
    Ok(())
}

async fn start_round(client: &ApiClient, session: &Session, args: StartArgs) -> Result<()> {
    let selection = CardSelection::try_from(args.cards.as_slice())?;
    let settings = GameSettings {
        bet_per_card: args.bet,
        commission: args.commission,
        interval: args.interval,
        pattern: args.pattern,
        language: args.language,
    };

    let balance = match client.fetch_balance(session).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            log_error(&format!("Unable to load balance: {e}"));
            None
        }
    };
    print!("{}", terminal::render_selection(&selection, &settings, balance, true));

    let round = client.start_game(session, &settings, &selection).await?;
    println!();
    println!("Round started: {}{}{}", Colors::green(), round.round_id, Colors::reset());
    println!("Shop: {}", round.shop_id);
    println!("Cards: {:?}", round.selected_cards);
    println!("Prize: {:.2}", round.prize);
    println!("Pattern: {}  Interval: {} ms  Language: {}", round.winning_pattern, round.interval_ms, round.language);
    Ok(())
}

fn show_results(catalog: &CardCatalog, notifier: &dyn Notifier, args: ResultsArgs) -> Result<()> {
    let called = parse_called(&args.called)?;
    let mut view = ResultsView::new(catalog, called, args.status, args.language)
        .with_winning(args.winners)
        .with_failed(args.failed);
    let colored = !args.plain;

    view.open(notifier);
    print!("{}", terminal::render_results(&mut view, colored));

    if !args.interactive || view.status() != ResultStatus::Failed {
        return Ok(());
    }

    for card in view.displayed_cards() {
        if view.is_locked(card.card_id) {
            continue;
        }
        println!("Card ID: {}  [L] lock  [ESC] exit  [any key] skip", card.card_id);
        match terminal::prompt_lock_key()? {
            KeyAction::Lock => {
                if view.lock(card.card_id, notifier) {
                    println!("This card is already checked.");
                }
            }
            KeyAction::Skip => {}
            KeyAction::Exit => break,
        }
    }

    let locked: Vec<CardId> = view.locked_cards().collect();
    if !locked.is_empty() {
        log_info(&format!("Locked cards: {locked:?}"));
    }
    Ok(())
}

fn generate_catalog(config: &ClientConfig, args: GenerateArgs) -> Result<()> {
    let seed = args.seed.unwrap_or(config.catalog_seed);
    let catalog = CardGenerator::seeded(seed).generate_catalog(args.count);
    catalog.save(&args.output)?;
    log_info(&format!("Wrote {} cards to {} (seed {seed})", catalog.len(), args.output));
    Ok(())
}

fn check_card(catalog: &CardCatalog, args: CheckArgs) -> Result<()> {
    let card = catalog.get(args.card).ok_or(ClientError::InvalidCardNumber(args.card))?;
    let called = parse_called(&args.called)?;
    let grid = card.to_grid();
    let cells = results::classify_cells(card, &called);

    print!("{}", terminal::render_card("Check", card, &cells, true));

    let lines = pattern::completed_lines(&grid, &called);
    let winning = pattern::evaluate(&grid, &called);
    println!("Completed lines: {}", lines.len());
    for line in &lines {
        println!("  {line}");
    }
    println!("Winning cells: {}", winning.len());

    if args.pattern.is_satisfied(&grid, &called) {
        println!("{}{}: WIN{}", Colors::green(), args.pattern, Colors::reset());
    } else {
        println!("{}{}: no win{}", Colors::red(), args.pattern, Colors::reset());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::load_or_default();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(shop_id) = cli.shop_id {
        config.shop_id = Some(shop_id);
    }

    let notifier: Box<dyn Notifier> = if cli.quiet { Box::new(SilentNotifier) } else { Box::new(TerminalNotifier) };

    match cli.command {
        Command::Balance => {
            let client = ApiClient::new(&config)?;
            show_balance(&client, &Session::from_config(&config)).await
        }
        Command::Start(args) => {
            let client = ApiClient::new(&config)?;
            start_round(&client, &Session::from_config(&config), args).await
        }
        Command::Results(args) => {
            let catalog = load_catalog(&config, cli.catalog.as_deref())?;
            show_results(&catalog, notifier.as_ref(), args)
        }
        Command::Generate(args) => generate_catalog(&config, args),
        Command::Check(args) => {
            let catalog = load_catalog(&config, cli.catalog.as_deref())?;
            check_card(&catalog, args)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log_error(&format!("{e}"));
        std::process::exit(1);
    }
}
