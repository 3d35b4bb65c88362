// ═══════════════════════════════════════════════════════════════════════
// Strategy Connector — session events in, client actions out
//
// Owns the mirror and one strategy. Every server event is folded into the
// mirror; when the mirror says a decision is ours, a debounce deadline is
// armed. Further events in the quiet period push the deadline back, so a
// burst of observed actions leads to a single request. The caller polls
// with the current time and sends whatever comes out.
//
// Time is passed in as `Instant`, never read here.
// ═══════════════════════════════════════════════════════════════════════

use crate::mirror::{GameState, MirrorError};
use crate::strategy::Strategy;
use log::{info, warn};
use magi_engine::protocol::{ClientAction, ServerEvent};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("mirror out of sync: {0}")]
    Mirror(#[from] MirrorError),
    #[error("malformed server event: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Debounce ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Debouncer { wait, deadline: None }
    }

    /// Restarts the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True once per quiet period, when it has elapsed.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

// ── Connector ──────────────────────────────────────────────────────────

pub struct StrategyConnector {
    strategy: Box<dyn Strategy>,
    game: Option<GameState>,
    debouncer: Debouncer,
}

impl StrategyConnector {
    pub fn new(strategy: Box<dyn Strategy>, debounce: Duration) -> Self {
        StrategyConnector { strategy, game: None, debouncer: Debouncer::new(debounce) }
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// When the pending decision fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn handle_event(&mut self, event: ServerEvent, now: Instant) -> Result<(), ConnectorError> {
        match event {
            ServerEvent::GameData { player_id, state } => {
                info!("{} strategy playing as player {}", self.strategy.name(), player_id);
                self.strategy.setup(player_id);
                self.game = Some(GameState::new(player_id, state));
            }
            ServerEvent::Action(action) => {
                let Some(game) = self.game.as_mut() else {
                    warn!("action before game data, ignored: {:?}", action);
                    return Ok(());
                };
                game.update(&action)?;
            }
        }
        self.schedule(now);
        Ok(())
    }

    /// One raw event as received from the session layer.
    pub fn handle_json(&mut self, raw: &str, now: Instant) -> Result<(), ConnectorError> {
        let event: ServerEvent = serde_json::from_str(raw)?;
        self.handle_event(event, now)
    }

    /// The action to send now, if the quiet period is over and the
    /// decision is still ours.
    pub fn poll(&mut self, now: Instant) -> Option<ClientAction> {
        if !self.debouncer.ready(now) {
            return None;
        }
        let game = self.game.as_ref().filter(|g| g.needs_decision())?;
        Some(self.strategy.request_action(game))
    }

    fn schedule(&mut self, now: Instant) {
        if self.game.as_ref().is_some_and(|g| g.needs_decision()) {
            self.debouncer.touch(now);
        } else {
            self.debouncer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::random::RandomStrategy;
    use crate::simulation::SimulationStrategy;
    use magi_engine::protocol::{CardRef, Effect, ServerAction};
    use magi_engine::types::*;

    const WAIT: Duration = Duration::from_millis(200);

    fn game_data(viewer: PlayerId, step: Step) -> ServerEvent {
        let mut sim = sim(step);
        put(&mut sim, ZoneType::ActiveMagi, 1, "Pruitt", 5);
        put(&mut sim, ZoneType::ActiveMagi, 2, "Grega", 8);
        put(&mut sim, ZoneType::InPlay, 1, "Weebo", 2);
        ServerEvent::GameData { player_id: viewer, state: view(&sim, viewer).state().clone() }
    }

    fn connector() -> StrategyConnector {
        StrategyConnector::new(Box::new(SimulationStrategy::default()), WAIT)
    }

    // ═══════════════════════════════════════════════════════════════════
    // DEBOUNCE TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_debounce_waits_for_quiet() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WAIT);
        assert!(!d.ready(t0 + WAIT));

        d.touch(t0);
        d.touch(t0 + Duration::from_millis(150));
        assert!(!d.ready(t0 + WAIT));
        assert!(d.is_pending());
        assert!(d.ready(t0 + Duration::from_millis(350)));
        // Fires once per quiet period.
        assert!(!d.ready(t0 + Duration::from_millis(400)));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_burst_triggers_one_request() {
        let t0 = Instant::now();
        let mut c = connector();
        c.handle_event(game_data(1, Step::Priority1), t0).unwrap();
        for i in 1..=3u64 {
            let notice = ServerEvent::Action(ServerAction::TimeNotification { player: Some(1) });
            c.handle_event(notice, t0 + Duration::from_millis(50 * i)).unwrap();
        }
        assert!(c.poll(t0 + WAIT).is_none());
        let action = c.poll(t0 + Duration::from_millis(150) + WAIT);
        assert!(action.is_some());
        assert!(c.poll(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_no_request_when_not_our_turn() {
        let t0 = Instant::now();
        let mut c = connector();
        c.handle_event(game_data(2, Step::Priority1), t0).unwrap();
        assert!(c.deadline().is_none());
        assert!(c.poll(t0 + Duration::from_secs(1)).is_none());

        // Turn passes to us.
        c.handle_event(ServerEvent::Action(ServerAction::Effect(Effect::StartOfTurn { player: 2 })), t0).unwrap();
        assert!(c.poll(t0 + WAIT).is_some());
    }

    // ═══════════════════════════════════════════════════════════════════
    // EVENT TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_action_before_game_data_is_ignored() {
        let mut c = connector();
        let pass = ServerEvent::Action(ServerAction::Pass { player: 1, new_step: Some(Step::Attack) });
        c.handle_event(pass, Instant::now()).unwrap();
        assert!(c.game().is_none());
    }

    #[test]
    fn test_json_events() {
        let t0 = Instant::now();
        let mut c = StrategyConnector::new(Box::new(RandomStrategy::new(1)), WAIT);
        let raw = serde_json::to_string(&game_data(1, Step::Attack)).unwrap();
        c.handle_json(&raw, t0).unwrap();
        assert_eq!(c.game().map(|g| g.step()), Some(Step::Attack));
        assert_eq!(c.strategy_name(), "Random");

        let err = c.handle_json("{\"event\": \"nonsense\"}", t0).unwrap_err();
        assert!(matches!(err, ConnectorError::Json(_)));
    }

    #[test]
    fn test_unknown_zone_propagates() {
        let t0 = Instant::now();
        let mut c = connector();
        c.handle_event(game_data(1, Step::Priority1), t0).unwrap();
        let moved = Effect::CardMovedBetweenZones {
            source_zone: "zones/limbo".into(),
            destination_zone: ZoneType::Discard.as_wire().into(),
            target: CardRef::hidden(CardId::new("x"), 1),
        };
        let err = c.handle_event(ServerEvent::Action(ServerAction::Effect(moved)), t0).unwrap_err();
        assert!(matches!(err, ConnectorError::Mirror(MirrorError::UnknownZone(_))));
    }
}
