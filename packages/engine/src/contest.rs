use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::info;

use crate::config::EngineConfig;
use crate::entity::{
    Contest, ContestStatus, MembershipStatus, Participation, ParticipationStatus, TransactionKind,
};
use crate::error::{EngineError, Result};
use crate::ledger::Ledger;
use crate::membership::MembershipGate;
use crate::source::{Identity, QuestionSource};

/// A contest and every participation it owns. The two always mutate
/// together under the same map entry, so ranking sees a consistent
/// snapshot and registrations cannot race past the capacity check.
struct ContestState {
    contest: Contest,
    participants: HashMap<i64, Participation>,
}

/// Orchestrates the contest lifecycle: registration (membership gate check,
/// entry-fee debit, prize-pool growth), answer grading, completion, ranking,
/// and payout.
///
/// Nested calls only ever go contest -> membership -> ledger, and neither of
/// those calls back in, so lock acquisition is acyclic.
pub struct ContestEngine {
    config: EngineConfig,
    ledger: Arc<Ledger>,
    memberships: Arc<MembershipGate>,
    questions: Arc<dyn QuestionSource>,
    identity: Arc<dyn Identity>,
    contests: DashMap<i64, ContestState>,
    contest_ids: AtomicI64,
    participation_ids: AtomicI64,
}

impl ContestEngine {
    pub fn new(
        config: EngineConfig,
        ledger: Arc<Ledger>,
        memberships: Arc<MembershipGate>,
        questions: Arc<dyn QuestionSource>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            config,
            ledger,
            memberships,
            questions,
            identity,
            contests: DashMap::new(),
            contest_ids: AtomicI64::new(1),
            participation_ids: AtomicI64::new(1),
        }
    }

    /// Create a contest that is immediately open for registration, with the
    /// entry fee and participant cap taken from the engine config.
    pub fn create_contest(
        &self,
        name: &str,
        description: &str,
        question_ids: Vec<i64>,
        duration_minutes: i64,
    ) -> Contest {
        let id = self.contest_ids.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let window = Duration::days(self.config.registration_days);

        let contest = Contest {
            id,
            name: name.to_string(),
            description: description.to_string(),
            entry_fee: self.config.entry_fee,
            prize_pool: 0,
            first_prize: 0,
            second_prize: 0,
            third_prize: 0,
            question_ids,
            duration_minutes,
            status: ContestStatus::Registering,
            max_participants: self.config.max_participants,
            current_participants: 0,
            registration_start_time: now,
            registration_end_time: now + window,
            start_time: now,
            end_time: now + window,
            created_at: now,
            updated_at: now,
        };

        info!(contest_id = id, name, "contest created");
        self.contests.insert(
            id,
            ContestState {
                contest: contest.clone(),
                participants: HashMap::new(),
            },
        );
        contest
    }

    pub fn list_contests(&self) -> Vec<Contest> {
        let mut contests: Vec<Contest> = self
            .contests
            .iter()
            .map(|entry| entry.contest.clone())
            .collect();
        contests.sort_by_key(|c| c.id);
        contests
    }

    pub fn contest(&self, contest_id: i64) -> Result<Contest> {
        self.contests
            .get(&contest_id)
            .map(|state| state.contest.clone())
            .ok_or(EngineError::ContestNotFound)
    }

    /// The contest's fixed ordered question sequence.
    pub fn contest_question_ids(&self, contest_id: i64) -> Result<Vec<i64>> {
        self.contests
            .get(&contest_id)
            .map(|state| state.contest.question_ids.clone())
            .ok_or(EngineError::ContestNotFound)
    }

    /// Register a user for a contest.
    ///
    /// The whole admission sequence runs under the contest's map entry:
    /// membership validity, open-for-registration, no duplicate entry,
    /// capacity, then the entry-fee debit. A failed debit aborts with no
    /// contest-side effect; on success the prize pool grows by the
    /// commission-net fee and the prize tiers are recomputed.
    pub fn register(&self, contest_id: i64, user_id: i64) -> Result<Participation> {
        let mut state = self
            .contests
            .get_mut(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;

        match self.memberships.membership(user_id) {
            None => return Err(EngineError::MembershipRequired),
            Some(m) if m.status != MembershipStatus::Active => {
                return Err(EngineError::MembershipExpired);
            }
            Some(_) => {}
        }
        if state.contest.status != ContestStatus::Registering {
            return Err(EngineError::ContestNotOpen);
        }
        if state.participants.contains_key(&user_id) {
            return Err(EngineError::AlreadyRegistered);
        }
        if state.contest.current_participants >= state.contest.max_participants {
            return Err(EngineError::ContestFull);
        }

        let entry_fee = state.contest.entry_fee;
        let description = format!("contest entry: {}", state.contest.name);
        self.ledger
            .debit(user_id, entry_fee, Some(contest_id), &description)?;

        let platform_share = (entry_fee as f64 * self.config.platform_commission) as i64;
        state.contest.prize_pool += entry_fee - platform_share;
        state.contest.current_participants += 1;
        state.contest.updated_at = Utc::now();
        recompute_prizes(&mut state.contest, self.config.target_prize_pool);

        let participation = Participation::new(
            self.participation_ids.fetch_add(1, Ordering::Relaxed),
            contest_id,
            user_id,
            self.identity.resolve_username(user_id),
            state.contest.question_ids.len() as u32,
        );
        state
            .participants
            .insert(user_id, participation.clone());

        info!(
            contest_id,
            user_id,
            prize_pool = state.contest.prize_pool,
            participants = state.contest.current_participants,
            "participant registered"
        );
        Ok(participation)
    }

    /// Explicitly mark a participation as in progress and stamp its start
    /// time. Answer submission does the same implicitly on first use.
    pub fn start(&self, contest_id: i64, user_id: i64) -> Result<Participation> {
        let mut state = self
            .contests
            .get_mut(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;
        let participant = state
            .participants
            .get_mut(&user_id)
            .ok_or(EngineError::NotRegistered)?;
        if participant.status == ParticipationStatus::Finished {
            return Err(EngineError::AlreadyFinished);
        }

        participant.status = ParticipationStatus::InProgress;
        participant.started_at = Some(Utc::now());
        info!(contest_id, user_id, "participant started");
        Ok(participant.clone())
    }

    /// Grade one answer and accumulate the participant's score and time.
    ///
    /// Comparison is whitespace-trimmed and case-insensitive. Returns
    /// whether the answer was correct. Resubmitting a question grades it
    /// again; dedup is left to the caller.
    pub fn submit_answer(
        &self,
        contest_id: i64,
        user_id: i64,
        question_id: i64,
        answer: &str,
        duration_ms: i64,
    ) -> Result<bool> {
        let mut state = self
            .contests
            .get_mut(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;
        let participant = state
            .participants
            .get_mut(&user_id)
            .ok_or(EngineError::NotRegistered)?;
        if participant.status == ParticipationStatus::Finished {
            return Err(EngineError::AlreadyFinished);
        }

        // Fetch the key before touching any state so an unknown question
        // leaves the participation unchanged.
        let key = self.questions.answer_key(question_id)?;

        if participant.status == ParticipationStatus::Registered {
            participant.status = ParticipationStatus::InProgress;
            participant.started_at = Some(Utc::now());
        }

        let correct = key.answer.trim().eq_ignore_ascii_case(answer.trim());
        if correct {
            participant.correct_count += 1;
            participant.total_score += key.points;
        }
        participant.total_duration += duration_ms;

        info!(contest_id, user_id, question_id, correct, "answer graded");
        Ok(correct)
    }

    /// Finish a participation and re-rank every finished participant of the
    /// contest.
    ///
    /// Ranking sorts by score descending, ties by total answering time
    /// ascending (registration order as the final tie-break, keeping the
    /// result deterministic). Ranks are reassigned on every pass; payout is
    /// issued at most once per participant, at the first pass where they
    /// hold a paying tier.
    pub fn finish(&self, contest_id: i64, user_id: i64) -> Result<Participation> {
        let mut state = self
            .contests
            .get_mut(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;

        {
            let participant = state
                .participants
                .get_mut(&user_id)
                .ok_or(EngineError::NotRegistered)?;
            if participant.status == ParticipationStatus::Finished {
                return Err(EngineError::AlreadyFinished);
            }
            participant.status = ParticipationStatus::Finished;
            participant.finished_at = Some(Utc::now());
        }

        self.rank_and_pay(&mut state)?;

        let participation = state
            .participants
            .get(&user_id)
            .cloned()
            .ok_or(EngineError::NotRegistered)?;
        info!(
            contest_id,
            user_id,
            score = participation.total_score,
            rank = participation.rank,
            "participant finished"
        );
        Ok(participation)
    }

    /// Finished participations in rank order.
    pub fn ranking(&self, contest_id: i64) -> Result<Vec<Participation>> {
        let state = self
            .contests
            .get(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;
        let mut finished: Vec<Participation> = state
            .participants
            .values()
            .filter(|p| p.status == ParticipationStatus::Finished)
            .cloned()
            .collect();
        finished.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(a.total_duration.cmp(&b.total_duration))
                .then(a.id.cmp(&b.id))
        });
        Ok(finished)
    }

    /// One user's record within one contest.
    pub fn participation(&self, contest_id: i64, user_id: i64) -> Result<Participation> {
        let state = self
            .contests
            .get(&contest_id)
            .ok_or(EngineError::ContestNotFound)?;
        state
            .participants
            .get(&user_id)
            .cloned()
            .ok_or(EngineError::NotRegistered)
    }

    /// All of a user's participations, most recent first.
    pub fn participations_for(&self, user_id: i64) -> Vec<Participation> {
        let mut participations: Vec<Participation> = self
            .contests
            .iter()
            .filter_map(|state| state.participants.get(&user_id).cloned())
            .collect();
        participations.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then(b.id.cmp(&a.id))
        });
        participations
    }

    fn rank_and_pay(&self, state: &mut ContestState) -> Result<()> {
        let ContestState {
            contest,
            participants,
        } = state;

        let mut standings: Vec<(i64, i64, i64, i64)> = participants
            .values()
            .filter(|p| p.status == ParticipationStatus::Finished)
            .map(|p| (p.user_id, p.total_score, p.total_duration, p.id))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.3.cmp(&b.3)));

        for (index, (user_id, ..)) in standings.iter().enumerate() {
            let rank = (index + 1) as u32;
            let prize = match index {
                0 => contest.first_prize,
                1 => contest.second_prize,
                2 => contest.third_prize,
                _ => 0,
            };
            let Some(participant) = participants.get_mut(user_id) else {
                continue;
            };
            participant.rank = rank;
            // reward_coins doubles as the paid-out marker: each participant
            // is paid at most once, even when later finishers shuffle ranks.
            if prize > 0 && participant.reward_coins == 0 {
                participant.reward_coins = prize;
                let description = format!("contest reward: rank {rank} in {}", contest.name);
                self.ledger.credit(
                    *user_id,
                    prize,
                    Some(contest.id),
                    &description,
                    TransactionKind::Reward,
                )?;
                info!(contest_id = contest.id, user_id, rank, prize, "prize paid");
            }
        }
        Ok(())
    }
}

/// Recompute the three prize tiers from the current pool.
///
/// At or above the target pool the tiers are straight 50/30/20 percent
/// splits. Below it, each tier scales down with the pool but is floored at
/// pool/2, pool/3, and pool/6 respectively so small contests still pay out.
fn recompute_prizes(contest: &mut Contest, target: i64) {
    let pool = contest.prize_pool;
    if pool >= target {
        contest.first_prize = (pool as f64 * 0.5) as i64;
        contest.second_prize = (pool as f64 * 0.3) as i64;
        contest.third_prize = (pool as f64 * 0.2) as i64;
    } else {
        let ratio = pool as f64 / target as f64;
        contest.first_prize = ((target as f64 * 0.5 * ratio) as i64).max(pool / 2);
        contest.second_prize = ((target as f64 * 0.3 * ratio) as i64).max(pool / 3);
        contest.third_prize = ((target as f64 * 0.2 * ratio) as i64).max(pool / 6);
    }
}
