//! Match simulator - plays full matches against the in-memory store.
//!
//! Every seat follows a scripted policy: one paid action per round, an
//! occasional colonization after passing, then pass. All fleets share one
//! sector so each round ends in a battle.

use std::sync::Arc;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rules_engine::{
    ActionKind, DiceCombatResolver, EngineConfig, InMemoryMatchStore, MatchFlowService,
    PlayerCommand, PlayerId, Resource, SectorId, ShipSnapshot, Weapon,
};
use tracing::{info, warn};

mod telemetry;

/// Upper bound on submitted commands per match.
const MAX_COMMANDS: usize = 10_000;

#[derive(Parser)]
#[command(name = "rules-engine")]
#[command(about = "Simulate scripted matches through the round orchestrator")]
struct Args {
    /// Number of seated players
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u8).range(2..=6))]
    players: u8,

    /// Rounds per match (defaults to RULES_MAX_ROUNDS or 9)
    #[arg(short, long)]
    rounds: Option<u8>,

    /// Policy seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of matches to play
    #[arg(short, long, default_value = "1")]
    matches: u32,
}

type Service = MatchFlowService<InMemoryMatchStore, DiceCombatResolver>;

const PAID_ACTIONS: [ActionKind; 4] = [
    ActionKind::Research,
    ActionKind::Upgrade,
    ActionKind::Build,
    ActionKind::Move,
];

fn random_ship(rng: &mut ChaCha8Rng) -> ShipSnapshot {
    let weapons = vec![Weapon {
        dice: rng.random_range(1..=2),
        damage: 1,
    }];
    ShipSnapshot::new(rng.random_range(0..=3), rng.random_range(1..=3), weapons, 0)
}

async fn play_match(
    service: &Service,
    match_id: &str,
    players: &[PlayerId],
    rng: &mut ChaCha8Rng,
) -> Result<(), Box<dyn std::error::Error>> {
    let created = service.create_match(match_id, players).await?;
    let battlefield = SectorId::from("s-000");
    let mut round_no = created.summary.round_no;
    let mut active = created.summary.active_player;
    let mut deployed_round = 0;

    for _ in 0..MAX_COMMANDS {
        if deployed_round != round_no {
            for player in players {
                let ship = random_ship(rng);
                service
                    .deploy_fleet(match_id, &battlefield, player, vec![ship], None)
                    .await?;
            }
            deployed_round = round_no;
        }

        let Some(player) = active.clone() else {
            break;
        };

        let loaded = service.load_match(match_id).await?;
        let state = &loaded.value.match_state;
        let acted = state.actions_taken.get(&player).is_some_and(|a| !a.is_empty());

        let command = if acted {
            PlayerCommand::pass()
        } else if rng.random_bool(0.2) {
            let sector = SectorId::new(format!("s-{round_no}-{player}"));
            PlayerCommand::targeted(ActionKind::Explore, sector)
        } else {
            PlayerCommand::action(PAID_ACTIONS[rng.random_range(0..PAID_ACTIONS.len())])
        };

        let result = match service
            .submit(match_id, &player, command, Some(loaded.version))
            .await
        {
            Ok(result) => result,
            Err(err) if err.is_rule_violation() => {
                warn!(match_id, player_id = %player, error = %err, "Rejected, passing instead");
                service.force_pass(match_id, &player, None).await?
            }
            Err(err) => return Err(err.into()),
        };

        // A player that just passed may colonize once with a spare ship.
        if acted && rng.random_bool(0.3) {
            let colonize = PlayerCommand::Colonize {
                resource: Resource::ALL[rng.random_range(0..Resource::ALL.len())],
            };
            if !result.record.match_state.is_finished() {
                if let Err(err) = service.submit(match_id, &player, colonize, None).await {
                    info!(match_id, player_id = %player, error = %err, "Colonize skipped");
                }
            }
        }

        info!(
            match_id,
            round = result.summary.round_no,
            phase = %result.summary.phase,
            active = ?result.summary.active_player,
            version = result.new_version,
            "Turn summary"
        );

        if result.record.match_state.is_finished() {
            for (player_id, econ) in &result.record.economies {
                info!(
                    match_id,
                    player_id = %player_id,
                    money = econ.resources.money,
                    science = econ.resources.science,
                    materials = econ.resources.materials,
                    "Final economy"
                );
            }
            info!(
                match_id,
                battles = result.record.combat_reports.len(),
                "Match finished"
            );
            return Ok(());
        }

        let latest = service.load_summary(match_id).await?;
        round_no = latest.value.round_no;
        active = latest.value.active_player;
    }

    Err(format!("match {match_id} did not finish within {MAX_COMMANDS} commands").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let args = Args::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(rounds) = args.rounds {
        config = config.with_max_rounds(rounds);
        config.validate()?;
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(seed, players = args.players, max_rounds = config.max_rounds, "Starting simulator");

    let service = MatchFlowService::new(
        Arc::new(InMemoryMatchStore::new()),
        Arc::new(DiceCombatResolver::new()),
        config,
    );
    let players: Vec<PlayerId> = (1..=args.players)
        .map(|i| PlayerId::new(format!("p{i}")))
        .collect();

    for n in 0..args.matches {
        let match_id = format!("sim-{seed:x}-{n}");
        play_match(&service, &match_id, &players, &mut rng).await?;
    }

    info!(
        matches = args.matches,
        archived = service.store().archived_count(),
        "Simulation complete"
    );
    Ok(())
}
