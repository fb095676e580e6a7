use std::collections::BTreeSet;
use std::mem;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::card::{CardDescriptor, CardEffect, CardKind};
use super::catalog::{CardCatalog, DeckRecipes};
use super::combatant::Combatant;
use super::config::{BattleSetup, CombatConfig};
use super::events::{CombatEvent, CombatOutcome, CombatReport};
use super::intent::{Intent, IntentError};
use super::phase::{CombatPhase, PhaseKind, PhaseTimer, Side, StagedCard, Transit};
use super::progress::ProgressStore;
use crate::ai::{choose_action, AiDecision, Persona};

const DEFAULT_BATTLE_ID: &str = "default";

type IntentResult = Result<Vec<CombatEvent>, IntentError>;

/// 战斗状态机：唯一有权修改双方状态的组件。
///
/// 外部驱动循环只做两件事：通过 [`CombatEngine::advance_time`] 推进时间，
/// 通过 [`CombatEngine::submit_intent`] 提交玩家意图。当前阶段不接受的意图
/// 会被静默丢弃。
#[derive(Debug, Clone)]
pub struct CombatEngine {
    config: CombatConfig,
    battle_id: String,
    persona: Persona,
    player: Combatant,
    enemy: Combatant,
    phase: CombatPhase,
    turn: u32,
    round: u32,
    last_stand_active: bool,
    rng: SmallRng,
    pending_reports: Vec<CombatReport>,
}

impl CombatEngine {
    pub fn new(player: Combatant, enemy: Combatant, persona: Persona, config: CombatConfig) -> Self {
        Self::with_rng(player, enemy, persona, config, SmallRng::from_entropy())
    }

    pub fn seeded(
        player: Combatant,
        enemy: Combatant,
        persona: Persona,
        config: CombatConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(player, enemy, persona, config, SmallRng::seed_from_u64(seed))
    }

    /// 根据战斗参数、卡牌目录与牌组配方开局。
    pub fn from_setup<C, D>(
        setup: &BattleSetup,
        config: CombatConfig,
        catalog: &C,
        decks: &D,
        seed: Option<u64>,
    ) -> Self
    where
        C: CardCatalog,
        D: DeckRecipes,
    {
        let player_cards = match &setup.player_deck {
            Some(card_ids) => catalog.instantiate(card_ids.iter().map(String::as_str)),
            None => decks.starter().build(catalog),
        };
        let recipe = decks.enemy(&setup.enemy_deck);
        let persona = setup
            .persona
            .as_deref()
            .map(Persona::resolve)
            .unwrap_or(recipe.persona);

        let player = Combatant::new("Player", setup.player_hp).with_deck(player_cards);
        let enemy = Combatant::new("Opponent", setup.enemy_hp).with_deck(recipe.build(catalog));
        let battle_id = config.resolve_battle_id(&setup.battle_id);
        let rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);

        tracing::debug!(
            battle_id = %battle_id,
            enemy_deck = %recipe.key,
            persona = %persona,
            gatekeeper = setup.is_gatekeeper,
            "starting combat"
        );

        let mut engine = Self::with_rng(player, enemy, persona, config, rng);
        engine.battle_id = battle_id;
        engine
    }

    fn with_rng(
        player: Combatant,
        enemy: Combatant,
        persona: Persona,
        config: CombatConfig,
        rng: SmallRng,
    ) -> Self {
        let battle_id = config.resolve_battle_id(DEFAULT_BATTLE_ID);
        let mut engine = Self {
            config,
            battle_id,
            persona,
            player,
            enemy,
            phase: CombatPhase::PlayerTurn,
            turn: 1,
            round: 1,
            last_stand_active: false,
            rng,
            pending_reports: Vec::new(),
        };
        engine.deal_opening_hands();
        engine
    }

    pub fn with_battle_id(mut self, battle_id: &str) -> Self {
        self.battle_id = self.config.resolve_battle_id(battle_id);
        self
    }

    fn deal_opening_hands(&mut self) {
        self.player.shuffle_deck(&mut self.rng);
        self.enemy.shuffle_deck(&mut self.rng);
        self.player.refill_hand(self.config.player_opening_hand);
        self.enemy.refill_hand(self.config.enemy_opening_hand);
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    pub fn side(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn phase(&self) -> &CombatPhase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_stand_active(&self) -> bool {
        self.last_stand_active
    }

    pub fn staged_card(&self) -> Option<&StagedCard> {
        self.phase.staged()
    }

    pub fn counter_card(&self) -> Option<&StagedCard> {
        self.phase.counter()
    }

    pub fn discard_selection(&self) -> Option<&BTreeSet<usize>> {
        match &self.phase {
            CombatPhase::PlayerDiscarding { selected } => Some(selected),
            _ => None,
        }
    }

    /// 当前计时阶段的进度，仅用于动画，不决定状态转移。
    pub fn timer_progress(&self) -> Option<f32> {
        self.phase.timer().map(PhaseTimer::progress)
    }

    /// 某一方持有的全部牌数（含正在飞行中的牌），单场战斗内保持不变。
    pub fn cards_held(&self, side: Side) -> usize {
        self.side(side).card_count() + self.phase.cards_in_flight(side)
    }

    pub fn pending_reports(&self) -> &[CombatReport] {
        &self.pending_reports
    }

    /// 把已结束战斗的记录交给进度存储，返回写入的条数。
    pub fn flush_progress<S: ProgressStore + ?Sized>(&mut self, store: &mut S) -> usize {
        let reports = mem::take(&mut self.pending_reports);
        for report in &reports {
            store.record(report);
        }
        reports.len()
    }

    /// 先推进时间，再处理本帧的意图。
    pub fn tick(&mut self, dt: Duration, intent: Option<Intent>) -> Vec<CombatEvent> {
        let mut events = self.advance_time(dt);
        if let Some(intent) = intent {
            events.extend(self.submit_intent(intent));
        }
        events
    }

    /// 推进当前阶段的计时器；每次调用最多触发一次到期转移。
    pub fn advance_time(&mut self, dt: Duration) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        let elapsed = self
            .phase
            .timer_mut()
            .map(|timer| timer.advance(dt))
            .unwrap_or(false);
        if elapsed {
            self.on_timer_elapsed(&mut events);
        }
        events
    }

    /// 提交意图；不合法的意图被丢弃并返回空事件列表。
    pub fn submit_intent(&mut self, intent: Intent) -> Vec<CombatEvent> {
        match self.try_intent(intent) {
            Ok(events) => events,
            Err(error) => {
                tracing::debug!(intent = intent.name(), %error, "dropping intent");
                Vec::new()
            }
        }
    }

    /// 与 [`Self::submit_intent`] 相同，但返回拒绝原因。
    pub fn try_intent(&mut self, intent: Intent) -> IntentResult {
        match intent {
            Intent::PlayCard { index } => self.play_card(intent, index),
            Intent::Draw => self.draw(intent),
            Intent::Pass => self.pass(intent),
            Intent::BeginDiscardSelect => self.begin_discard_select(intent),
            Intent::ToggleDiscard { index } => self.toggle_discard(intent, index),
            Intent::ConfirmDiscard => self.confirm_discard(intent),
            Intent::CancelDiscard => self.cancel_discard(intent),
            Intent::ResolveStaged => self.resolve_staged(intent),
            Intent::CancelStaged => self.cancel_staged(intent),
            Intent::PlayDefense { index } => self.play_defense(intent, index),
            Intent::SkipCounter => self.skip_counter(intent),
            Intent::DebugForceWin => self.debug_finish(intent, CombatOutcome::Victory),
            Intent::DebugForceLose => self.debug_finish(intent, CombatOutcome::Defeat),
            Intent::ContinueAfterCombat => self.continue_after_combat(intent),
        }
    }

    fn wrong_phase(&self, intent: Intent) -> IntentError {
        IntentError::WrongPhase {
            intent: intent.name(),
            phase: self.phase.kind(),
        }
    }

    fn ensure_phase(&self, intent: Intent, expected: PhaseKind) -> Result<(), IntentError> {
        if self.phase.kind() != expected {
            return Err(self.wrong_phase(intent));
        }
        Ok(())
    }

    /// 取出当前阶段的数据；不匹配时原样放回并报错。
    fn take_phase<T>(
        &mut self,
        intent: Intent,
        extract: impl FnOnce(CombatPhase) -> Result<T, CombatPhase>,
    ) -> Result<T, IntentError> {
        match extract(mem::take(&mut self.phase)) {
            Ok(value) => Ok(value),
            Err(phase) => {
                self.phase = phase;
                Err(self.wrong_phase(intent))
            }
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    fn play_card(&mut self, intent: Intent, index: usize) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::PlayerTurn)?;
        let kind = self
            .player
            .hand
            .get(index)
            .map(CardDescriptor::kind)
            .ok_or(IntentError::NoSuchCard { index })?;
        if self.last_stand_active && kind != CardKind::Heal {
            return Err(IntentError::LastStandRestricted);
        }
        if kind == CardKind::Defense {
            return Err(IntentError::NotPlayable { index, kind });
        }

        let card = self
            .player
            .take_from_hand(index)
            .ok_or(IntentError::NoSuchCard { index })?;
        let events = vec![CombatEvent::CardStaged {
            side: Side::Player,
            card_id: card.id.clone(),
            hand_index: index,
        }];
        tracing::debug!(card = %card.id, index, "player stages card");
        self.phase = CombatPhase::PlayerCardStaging {
            timer: PhaseTimer::start(self.config.card_transit()),
            staged: StagedCard::new(card, Side::Player, index),
            transit: Transit::ToStaging,
        };
        Ok(events)
    }

    fn draw(&mut self, intent: Intent) -> IntentResult {
        match self.phase.kind() {
            PhaseKind::PlayerTurn if self.last_stand_active => {
                return Err(IntentError::LastStandRestricted)
            }
            PhaseKind::PlayerTurn | PhaseKind::WaitingForCounter => {}
            _ => return Err(self.wrong_phase(intent)),
        }
        let limit = self.config.max_hand_size;
        if self.player.hand.len() >= limit {
            return Err(IntentError::HandFull { limit });
        }

        let mut events = Vec::new();
        self.draw_for(Side::Player, &mut events);
        Ok(events)
    }

    fn pass(&mut self, intent: Intent) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::PlayerTurn)?;
        let mut events = Vec::new();
        if self.last_stand_active {
            tracing::debug!("player forfeits the last stand");
            self.finish_combat(CombatOutcome::Defeat, &mut events);
        } else {
            self.start_enemy_turn(&mut events);
        }
        Ok(events)
    }

    fn begin_discard_select(&mut self, intent: Intent) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::PlayerTurn)?;
        if self.last_stand_active {
            return Err(IntentError::LastStandRestricted);
        }
        self.phase = CombatPhase::PlayerDiscarding {
            selected: BTreeSet::new(),
        };
        Ok(Vec::new())
    }

    fn toggle_discard(&mut self, intent: Intent, index: usize) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::PlayerDiscarding)?;
        if index >= self.player.hand.len() {
            return Err(IntentError::NoSuchCard { index });
        }
        if let CombatPhase::PlayerDiscarding { selected } = &mut self.phase {
            if !selected.remove(&index) {
                selected.insert(index);
            }
        }
        Ok(Vec::new())
    }

    fn confirm_discard(&mut self, intent: Intent) -> IntentResult {
        let CombatPhase::PlayerDiscarding { selected } = &self.phase else {
            return Err(self.wrong_phase(intent));
        };
        if selected.is_empty() {
            return Err(IntentError::NothingSelected);
        }
        let indices: Vec<usize> = selected.iter().rev().copied().collect();

        let mut card_ids = Vec::with_capacity(indices.len());
        for index in indices {
            if let Some(card) = self.player.take_from_hand(index) {
                card_ids.push(card.id.clone());
                self.player.discard(card);
            }
        }
        card_ids.reverse();

        let mut events = vec![CombatEvent::CardsDiscarded {
            side: Side::Player,
            card_ids,
        }];
        self.start_enemy_turn(&mut events);
        Ok(events)
    }

    fn cancel_discard(&mut self, intent: Intent) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::PlayerDiscarding)?;
        self.phase = CombatPhase::PlayerTurn;
        Ok(Vec::new())
    }

    fn cancel_staged(&mut self, intent: Intent) -> IntentResult {
        match &self.phase {
            CombatPhase::WaitingForResolve { staged } if staged.owner == Side::Player => {}
            CombatPhase::WaitingForResolve { .. } | CombatPhase::ResolveWithCounter { .. } => {
                return Err(IntentError::NotCancellable)
            }
            _ => return Err(self.wrong_phase(intent)),
        }
        let staged = self.take_phase(intent, |phase| match phase {
            CombatPhase::WaitingForResolve { staged } => Ok(staged),
            other => Err(other),
        })?;
        tracing::debug!(card = %staged.card.id, "player cancels staged card");
        self.phase = CombatPhase::PlayerCardStaging {
            timer: PhaseTimer::start(self.config.card_transit()),
            staged,
            transit: Transit::ReturnToHand,
        };
        Ok(Vec::new())
    }

    fn play_defense(&mut self, intent: Intent, index: usize) -> IntentResult {
        self.ensure_phase(intent, PhaseKind::WaitingForCounter)?;
        let kind = self
            .player
            .hand
            .get(index)
            .map(CardDescriptor::kind)
            .ok_or(IntentError::NoSuchCard { index })?;
        if kind != CardKind::Defense {
            return Err(IntentError::NotDefense { index, kind });
        }

        let staged = self.take_phase(intent, |phase| match phase {
            CombatPhase::WaitingForCounter { staged } => Ok(staged),
            other => Err(other),
        })?;
        let Some(card) = self.player.take_from_hand(index) else {
            self.phase = CombatPhase::WaitingForCounter { staged };
            return Err(IntentError::NoSuchCard { index });
        };

        let events = vec![CombatEvent::CounterPlayed {
            card_id: card.id.clone(),
            hand_index: index,
        }];
        self.phase = CombatPhase::CounterStaging {
            timer: PhaseTimer::start(self.config.counter_transit()),
            staged,
            counter: StagedCard::new(card, Side::Player, index),
        };
        Ok(events)
    }

    fn skip_counter(&mut self, intent: Intent) -> IntentResult {
        let staged = self.take_phase(intent, |phase| match phase {
            CombatPhase::WaitingForCounter { staged } => Ok(staged),
            other => Err(other),
        })?;
        self.phase = CombatPhase::WaitingForResolve { staged };
        Ok(Vec::new())
    }

    fn resolve_staged(&mut self, intent: Intent) -> IntentResult {
        let (staged, counter) = self.take_phase(intent, |phase| match phase {
            CombatPhase::WaitingForResolve { staged } => Ok((staged, None)),
            CombatPhase::ResolveWithCounter { staged, counter } => Ok((staged, Some(counter))),
            other => Err(other),
        })?;

        let mut events = Vec::new();
        let owner = staged.owner;
        let target = owner.opponent();

        match staged.card.effect {
            CardEffect::Attack { damage } => {
                let blocked = counter
                    .as_ref()
                    .and_then(|counter| counter.card.defense_value())
                    .unwrap_or(0)
                    .min(damage);
                let amount = self.side_mut(target).take_damage(damage - blocked);
                tracing::debug!(?owner, damage, blocked, amount, "attack resolved");
                events.push(CombatEvent::DamageDealt {
                    source: owner,
                    target,
                    amount,
                    blocked,
                });
            }
            CardEffect::Heal { amount } => {
                let amount = self.side_mut(owner).heal(amount);
                tracing::debug!(?owner, amount, "heal resolved");
                events.push(CombatEvent::Healed {
                    side: owner,
                    amount,
                });
            }
            CardEffect::Defense { .. } => {}
        }

        self.side_mut(owner).discard(staged.card);
        if let Some(counter) = counter {
            self.side_mut(counter.owner).discard(counter.card);
        }

        if self.check_vital_signs(&mut events) {
            return Ok(events);
        }
        self.finish_turn(owner, &mut events);
        Ok(events)
    }

    /// 按固定顺序检查胜负与绝地状态，返回战斗是否已结束。
    fn check_vital_signs(&mut self, events: &mut Vec<CombatEvent>) -> bool {
        if self.enemy.is_defeated() {
            self.finish_combat(CombatOutcome::Victory, events);
            return true;
        }

        if self.player.is_defeated() {
            if self.player.holds_kind(CardKind::Heal) {
                if !self.last_stand_active {
                    tracing::debug!("player enters last stand");
                    events.push(CombatEvent::LastStandEntered);
                }
                self.last_stand_active = true;
                return false;
            }
            self.finish_combat(CombatOutcome::Defeat, events);
            return true;
        }

        if self.last_stand_active {
            self.last_stand_active = false;
            events.push(CombatEvent::LastStandCleared);
        }
        false
    }

    fn finish_combat(&mut self, outcome: CombatOutcome, events: &mut Vec<CombatEvent>) {
        self.phase = match outcome {
            CombatOutcome::Victory => CombatPhase::Victory,
            CombatOutcome::Defeat => CombatPhase::Defeat,
        };
        tracing::info!(
            battle_id = %self.battle_id,
            ?outcome,
            turn = self.turn,
            round = self.round,
            "combat finished"
        );
        self.pending_reports.push(CombatReport {
            battle_id: self.battle_id.clone(),
            outcome,
            round: self.round,
            turn: self.turn,
        });
        events.push(CombatEvent::CombatEnded {
            outcome,
            battle_id: self.battle_id.clone(),
        });
    }

    /// 回合结束：先检查是否需要洗牌（玩家优先，一次只洗一方），再推进回合。
    fn finish_turn(&mut self, owner: Side, events: &mut Vec<CombatEvent>) {
        for target in [Side::Player, Side::Enemy] {
            if self.side(target).needs_reshuffle() {
                tracing::debug!(?target, ?owner, "starting reshuffle");
                events.push(CombatEvent::ReshuffleStarted { target });
                self.phase = CombatPhase::Reshuffling {
                    timer: PhaseTimer::start(self.config.reshuffle()),
                    target,
                    owner,
                };
                return;
            }
        }
        self.progress_turn(owner, events);
    }

    fn progress_turn(&mut self, owner: Side, events: &mut Vec<CombatEvent>) {
        // 绝地状态下控制权留在玩家手中
        if self.last_stand_active {
            self.phase = CombatPhase::PlayerTurn;
            return;
        }
        match owner {
            Side::Player => self.start_enemy_turn(events),
            Side::Enemy => {
                while self.enemy.hand.len() < self.config.max_hand_size {
                    if !self.draw_for(Side::Enemy, events) {
                        break;
                    }
                }
                self.start_player_turn(events);
            }
        }
    }

    fn start_player_turn(&mut self, events: &mut Vec<CombatEvent>) {
        self.turn += 1;
        events.push(CombatEvent::TurnStarted { turn: self.turn });
        self.phase = CombatPhase::PlayerTurn;
    }

    fn start_enemy_turn(&mut self, events: &mut Vec<CombatEvent>) {
        events.push(CombatEvent::EnemyTurnStarted);
        self.phase = CombatPhase::EnemyThinking {
            timer: PhaseTimer::start(self.config.enemy_think()),
        };
    }

    fn draw_for(&mut self, side: Side, events: &mut Vec<CombatEvent>) -> bool {
        match self.side_mut(side).draw_card().map(|card| card.id.clone()) {
            Some(card_id) => {
                events.push(CombatEvent::CardDrawn { side, card_id });
                true
            }
            None => {
                events.push(CombatEvent::DeckExhausted { side });
                false
            }
        }
    }

    fn counter_window_open(&self, staged: &StagedCard) -> bool {
        staged.owner == Side::Enemy
            && staged.card.is_kind(CardKind::Attack)
            && self.player.holds_kind(CardKind::Defense)
    }

    fn on_timer_elapsed(&mut self, events: &mut Vec<CombatEvent>) {
        match mem::take(&mut self.phase) {
            CombatPhase::PlayerCardStaging {
                staged,
                transit: Transit::ToStaging,
                ..
            } => {
                self.phase = CombatPhase::WaitingForResolve { staged };
            }
            CombatPhase::PlayerCardStaging {
                staged,
                transit: Transit::ReturnToHand,
                ..
            } => {
                let StagedCard {
                    card,
                    owner,
                    hand_index,
                } = staged;
                let card_id = card.id.clone();
                let hand_index = self.side_mut(owner).return_to_hand(hand_index, card);
                events.push(CombatEvent::CardReturned {
                    side: owner,
                    card_id,
                    hand_index,
                });
                self.phase = CombatPhase::PlayerTurn;
            }
            CombatPhase::EnemyThinking { .. } => self.run_enemy_decision(events),
            CombatPhase::EnemyCardStaging { staged, .. } => {
                if self.counter_window_open(&staged) {
                    events.push(CombatEvent::CounterWindowOpened);
                    self.phase = CombatPhase::WaitingForCounter { staged };
                } else {
                    self.phase = CombatPhase::WaitingForResolve { staged };
                }
            }
            CombatPhase::EnemyDiscarding { card, .. } => {
                events.push(CombatEvent::EnemyDiscarded {
                    card_id: card.id.clone(),
                });
                self.enemy.discard(card);
                self.draw_for(Side::Enemy, events);
                self.start_player_turn(events);
            }
            CombatPhase::CounterStaging {
                staged, counter, ..
            } => {
                self.phase = CombatPhase::ResolveWithCounter { staged, counter };
            }
            CombatPhase::Reshuffling { target, owner, .. } => {
                let combatant = match target {
                    Side::Player => &mut self.player,
                    Side::Enemy => &mut self.enemy,
                };
                let deck_size = combatant.recycle_discard_pile(&mut self.rng);
                events.push(CombatEvent::Reshuffled { target, deck_size });
                self.progress_turn(owner, events);
            }
            other => self.phase = other,
        }
    }

    fn run_enemy_decision(&mut self, events: &mut Vec<CombatEvent>) {
        if self.enemy.hand.is_empty() {
            tracing::debug!("enemy has no cards, ending its turn");
            self.finish_turn(Side::Enemy, events);
            return;
        }

        let decision = choose_action(
            &self.enemy.hand,
            self.enemy.health_fraction(),
            self.player.health,
            self.persona,
        );
        tracing::debug!(?decision, persona = %self.persona, "enemy decided");

        match decision {
            AiDecision::PlayCard { index, .. } => {
                let Some(card) = self.enemy.take_from_hand(index) else {
                    self.finish_turn(Side::Enemy, events);
                    return;
                };
                events.push(CombatEvent::CardStaged {
                    side: Side::Enemy,
                    card_id: card.id.clone(),
                    hand_index: index,
                });
                self.phase = CombatPhase::EnemyCardStaging {
                    timer: PhaseTimer::start(self.config.card_transit()),
                    staged: StagedCard::new(card, Side::Enemy, index),
                };
            }
            AiDecision::DiscardFallback => {
                let Some(card) = self.enemy.take_from_hand(0) else {
                    self.finish_turn(Side::Enemy, events);
                    return;
                };
                self.phase = CombatPhase::EnemyDiscarding {
                    timer: PhaseTimer::start(self.config.enemy_discard()),
                    card,
                };
            }
        }
    }

    fn debug_finish(&mut self, intent: Intent, outcome: CombatOutcome) -> IntentResult {
        if !self.config.debug_mode {
            return Err(IntentError::DebugDisabled);
        }
        self.ensure_phase(intent, PhaseKind::PlayerTurn)?;

        let loser = match outcome {
            CombatOutcome::Victory => &mut self.enemy,
            CombatOutcome::Defeat => &mut self.player,
        };
        let remaining = loser.health;
        loser.take_damage(remaining);

        let mut events = Vec::new();
        self.finish_combat(outcome, &mut events);
        Ok(events)
    }

    fn continue_after_combat(&mut self, intent: Intent) -> IntentResult {
        if !self.phase.is_terminal() {
            return Err(self.wrong_phase(intent));
        }
        let mut events = Vec::new();
        self.reset_session(&mut events);
        Ok(events)
    }

    /// 重赛：双方牌组重建并洗牌，生命回满，回合归 1，轮次加 1。
    fn reset_session(&mut self, events: &mut Vec<CombatEvent>) {
        for combatant in [&mut self.player, &mut self.enemy] {
            combatant.reset_deck();
            combatant.restore_health();
        }
        self.deal_opening_hands();
        self.phase = CombatPhase::PlayerTurn;
        self.turn = 1;
        self.round += 1;
        self.last_stand_active = false;
        tracing::info!(round = self.round, battle_id = %self.battle_id, "combat reset");
        events.push(CombatEvent::SessionReset { round: self.round });
    }
}
