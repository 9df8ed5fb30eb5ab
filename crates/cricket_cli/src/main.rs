//! Calculator cricket console front end.
//!
//! `sim` plays a whole match from a seed; `play` walks through one
//! delivery per Enter press.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cricket_core::engine::format_overs_with;
use cricket_core::{
    simulate_match, CoinFace, Delivery, Game, InningsSummary, MatchConfig, MatchPhase,
    MatchRequest, Milestone, NamePools, SeededRolls, TeamSlot, TossDecision,
};

#[derive(Parser)]
#[command(name = "cricket")]
#[command(about = "Limited-overs cricket decided by a ten-sided die", long_about = None)]
struct Cli {
    /// Log engine decisions to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full match and print the scorecards
    Sim {
        /// Seed for every random draw; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value = "Team A")]
        team1: String,

        #[arg(long, default_value = "Team B")]
        team2: String,

        /// Team 1's toss call (heads/tails)
        #[arg(long)]
        call: Option<CoinFace>,

        /// Team 1's choice if it wins the toss (bat/bowl)
        #[arg(long)]
        decision: Option<TossDecision>,

        /// Overs per innings
        #[arg(long, default_value_t = 20)]
        overs: u32,

        /// Print the match report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Play a match ball by ball
    Play {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value = "Team A")]
        team1: String,

        #[arg(long, default_value = "Team B")]
        team2: String,

        #[arg(long, default_value_t = 20)]
        overs: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sim { seed, team1, team2, call, decision, overs, json } => {
            let mut request = MatchRequest::new(seed.unwrap_or_else(clock_seed));
            tracing::debug!(seed = request.seed, overs, "simulating match");
            request.team1 = team1;
            request.team2 = team2;
            request.toss_call = call;
            request.toss_decision = decision;
            request.config = Some(MatchConfig::default().with_overs(overs));

            let report = simulate_match(&request).context("match simulation failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if let Some(toss) = &report.toss {
                let winner = match toss.winner {
                    TeamSlot::Team1 => &report.team1,
                    TeamSlot::Team2 => &report.team2,
                };
                println!("Toss: {} called {}, it came down {}.", report.team1, toss.call, toss.flip);
                println!("{winner} won the toss and chose to {}.\n", toss.decision);
            }
            print_innings(&report.first_innings);
            print_innings(&report.second_innings);
            println!("{}", report.result_text);
            println!("(seed {})", request.seed);
        }

        Commands::Play { seed, team1, team2, overs } => {
            play_interactive(seed.unwrap_or_else(clock_seed), team1, team2, overs)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn print_innings(summary: &InningsSummary) {
    println!("{summary}");
    for over in &summary.over_summaries {
        println!("  {over}");
    }
    let scorers: Vec<String> = summary
        .top_scorers
        .iter()
        .map(|l| format!("{} {} ({})", l.short_name, l.runs, l.balls))
        .collect();
    let bowlers: Vec<String> = summary
        .top_bowlers
        .iter()
        .map(|l| format!("{} {}/{}", l.short_name, l.wickets, l.runs))
        .collect();
    println!("\nTop scorers: {}", scorers.join(", "));
    println!("Top bowlers: {}\n", bowlers.join(", "));
}

/// Ask until the answer parses.
fn prompt<T: FromStr<Err = cricket_core::ParseChoiceError>>(
    input: &mut impl BufRead,
    question: &str,
) -> Result<T> {
    loop {
        print!("{question} ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input closed");
        }
        match line.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(err) => println!("{err}, try again."),
        }
    }
}

/// Wait for Enter. `false` means the player asked to quit.
fn wait_for_ball(input: &mut impl BufRead) -> Result<bool> {
    print!("[Enter] to bowl, q to quit: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(!line.trim().eq_ignore_ascii_case("q"))
}

fn play_interactive(seed: u64, team1: String, team2: String, overs: u32) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    tracing::debug!(seed, overs, "starting interactive match");
    let mut rng = SeededRolls::new(seed);
    let config = MatchConfig::default().with_overs(overs);
    let mut game = Game::new(team1, team2, config, &NamePools::default(), &mut rng)?;

    for slot in [TeamSlot::Team1, TeamSlot::Team2] {
        let team = game.team(slot);
        let names: Vec<&str> = team.players.iter().map(|p| p.short_name.as_str()).collect();
        println!("{}: {}", team.name, names.join(", "));
        println!("  captain {}, keeper {}", team.captain().short_name, team.keeper().short_name);
    }

    let question = format!("{}, call the toss (heads/tails):", game.team(TeamSlot::Team1).name);
    let call: CoinFace = prompt(&mut input, &question)?;
    // Only used if the call is right
    let decision: TossDecision = prompt(&mut input, "If you win, bat or bowl?")?;
    let toss = game.toss(call, Some(decision), &mut rng)?;
    println!(
        "It's {}. {} won the toss and chose to {}.",
        toss.flip,
        game.team(toss.winner).name,
        toss.decision
    );

    let balls_per_over = game.config().balls_per_over;
    let mut legal_balls = 0;
    while game.phase() != MatchPhase::Complete {
        if !wait_for_ball(&mut input)? {
            println!("Match abandoned.");
            return Ok(());
        }
        let delivery = game.bowl_next(&mut rng)?;
        if delivery.ball.is_legal {
            legal_balls += 1;
        }
        print_delivery(&delivery, &format_overs_with(legal_balls, balls_per_over));

        if let Some(end) = delivery.end {
            legal_balls = 0;
            println!("Innings over: {end}");
            if game.phase() == MatchPhase::SecondInnings {
                if let Some(target) = game.target() {
                    println!("Target: {target}");
                }
            }
            continue;
        }

        if let (Some(innings), Some(batting)) = (game.current_innings(), game.batting_team()) {
            print!("{} {}", batting.name, batting.score());
            if let Some(chase) = innings.chase(batting, game.config()) {
                print!(" | {chase}");
                if let Some(rate) = chase.required_rate(balls_per_over) {
                    print!(" (RRR {rate:.2})");
                }
            }
            println!();
        }
    }

    let report = game.report(Some(seed))?;
    print_innings(&report.first_innings);
    print_innings(&report.second_innings);
    println!("{}", report.result_text);
    Ok(())
}

fn print_delivery(delivery: &Delivery, overs: &str) {
    let ball = &delivery.ball;
    println!(
        "{} {} to {}: {}",
        overs,
        ball.bowler,
        ball.striker,
        ball.description
    );
    if let Some(next) = &ball.new_batter {
        println!("  {next} comes to the crease");
    }
    match delivery.milestone {
        Some(Milestone::HalfCentury) => println!("  Fifty for {}!", ball.striker),
        Some(Milestone::Century) => println!("  Hundred for {}!", ball.striker),
        None => {}
    }
    if let Some(over) = &delivery.over_completed {
        println!("  {over}");
    }
}
