//! Reaction bubbles
//!
//! Finished interactions publish a short message for the UI to show above
//! the creature. Delivery is fire-and-forget: nobody listening means the
//! message is dropped.

use std::sync::mpsc::{channel, Receiver, Sender};

use cavy_scene::SceneRng;

use crate::interaction::InteractionKind;
use crate::needs::WellnessTier;

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub creature_id: String,
    pub kind: InteractionKind,
    pub tier: WellnessTier,
    pub message: String,
}

/// Owns the subscriber side of every reaction channel
#[derive(Debug, Default)]
pub struct ReactionDispatcher {
    subscribers: Vec<Sender<Reaction>>,
    published: u64,
}

impl ReactionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<Reaction> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Send to every live subscriber and drop the ones that hung up.
    /// Returns how many received it.
    pub fn publish(&mut self, reaction: Reaction) -> usize {
        self.published += 1;
        self.subscribers
            .retain(|tx| tx.send(reaction.clone()).is_ok());
        if self.subscribers.is_empty() {
            log::debug!("No listeners for reaction: {}", reaction.message);
        }
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

const PETTING_MESSAGES: [&[&str]; 5] = [
    &["*wheeks happily*", "*purrs and leans in*", "*popcorns with joy*"],
    &["*purrs softly*", "*closes eyes contentedly*"],
    &["*tolerates the pets*", "*sniffs your hand*"],
    &["*flinches a little*", "*gives a tired squeak*"],
    &["*hides its face*", "*too unwell to enjoy it*"],
];

const FEEDING_MESSAGES: [&[&str]; 5] = [
    &["*munches excitedly*", "*wheeks for more*", "*happy chewing noises*"],
    &["*nibbles happily*", "*takes the treat gently*"],
    &["*chews slowly*", "*sniffs before eating*"],
    &["*eats hungrily*", "*grabs it and retreats*"],
    &["*barely nibbles*", "*weak squeak*"],
];

fn tier_index(tier: WellnessTier) -> usize {
    match tier {
        WellnessTier::Excellent => 0,
        WellnessTier::Good => 1,
        WellnessTier::Fair => 2,
        WellnessTier::Poor => 3,
        WellnessTier::Critical => 4,
    }
}

/// Candidate messages for an interaction at a wellness tier
pub fn reaction_messages(kind: InteractionKind, tier: WellnessTier) -> &'static [&'static str] {
    let table = match kind {
        InteractionKind::Petting => &PETTING_MESSAGES,
        InteractionKind::HandFeed => &FEEDING_MESSAGES,
    };
    table[tier_index(tier)]
}

/// Pick one message from the tier's table.
pub fn choose_reaction(
    kind: InteractionKind,
    tier: WellnessTier,
    rng: &mut impl SceneRng,
) -> &'static str {
    let messages = reaction_messages(kind, tier);
    let i = ((rng.next_f32() * messages.len() as f32) as usize).min(messages.len() - 1);
    messages[i]
}
