//! Agents and the name → factory registry used to pick one at startup

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tactician_battle::{BattleState, Dex};

use crate::action::{Action, LeadChoice, random_action};
use crate::config::EngineConfig;
use crate::damage::DamageCalculator;
use crate::engine::DecisionEngine;
use crate::memory::MatchSession;

/// Anything that can play a match
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn choose_lead(&self, preview: &BattleState, session: &mut MatchSession) -> LeadChoice;

    fn choose_action(&self, state: &BattleState, session: &mut MatchSession) -> Action;
}

/// An agent driven by a [`DecisionEngine`] cascade
#[derive(Debug, Clone)]
pub struct HeuristicAgent {
    name: String,
    engine: DecisionEngine,
}

impl HeuristicAgent {
    pub fn new(name: impl Into<String>, engine: DecisionEngine) -> Self {
        Self {
            name: name.into(),
            engine,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_lead(&self, preview: &BattleState, session: &mut MatchSession) -> LeadChoice {
        self.engine.choose_lead(preview, session)
    }

    fn choose_action(&self, state: &BattleState, session: &mut MatchSession) -> Action {
        self.engine.choose_action(state, session)
    }
}

/// Uniformly random legal play, useful as a baseline opponent
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAgent;

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_lead(&self, preview: &BattleState, session: &mut MatchSession) -> LeadChoice {
        let team_size = preview.ally.roster.len();
        let indices: Vec<usize> = (0..team_size).collect();
        match indices.choose(&mut session.rng) {
            Some(&lead) => LeadChoice::with_lead(lead, team_size),
            None => LeadChoice::in_order(team_size),
        }
    }

    fn choose_action(&self, state: &BattleState, session: &mut MatchSession) -> Action {
        random_action(state, &mut session.rng)
    }
}

/// Shared inputs every factory builds from
#[derive(Clone)]
pub struct AgentContext {
    pub dex: Arc<Dex>,
    pub calculator: Arc<dyn DamageCalculator>,
}

impl AgentContext {
    pub fn new(dex: Arc<Dex>, calculator: Arc<dyn DamageCalculator>) -> Self {
        Self { dex, calculator }
    }
}

pub type AgentFactory = Box<dyn Fn(&AgentContext) -> Box<dyn Agent> + Send + Sync>;

/// Agents by name
#[derive(Default)]
pub struct AgentRegistry {
    factories: BTreeMap<String, AgentFactory>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `expert`, `hazard_stack` and `random`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_config("expert", EngineConfig::expert());
        registry.register_config("hazard_stack", EngineConfig::hazard_stack());
        registry.register("random", |_| Box::new(RandomAgent));
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&AgentContext) -> Box<dyn Agent> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Register a heuristic agent built from a cascade configuration
    pub fn register_config(&mut self, name: impl Into<String>, config: EngineConfig) {
        let name = name.into();
        let agent_name = name.clone();
        self.register(name, move |ctx| {
            let engine = DecisionEngine::new(ctx.dex.clone(), ctx.calculator.clone(), config.clone());
            Box::new(HeuristicAgent::new(agent_name.clone(), engine))
        });
    }

    pub fn create(&self, name: &str, ctx: &AgentContext) -> Option<Box<dyn Agent>> {
        let factory = self.factories.get(name)?;
        Some(factory(ctx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
