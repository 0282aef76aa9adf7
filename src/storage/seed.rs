//! Curated starter collection loaded into an empty vault.

use super::{NewQuote, QuoteStore, StorageError};

/// A seed entry with its metadata.
pub struct SeedQuote {
    /// Quote body.
    pub text: &'static str,
    /// Author name.
    pub author: &'static str,
    /// Book or work the quote comes from.
    pub source: &'static str,
    /// Publication year.
    pub year: i32,
    /// Tags attached on insert.
    pub tags: &'static [&'static str],
}

const ADAMS: &str = "Douglas Adams";
const HITCHHIKER: &str = "The Hitchhiker's Guide to the Galaxy";
const RESTAURANT: &str = "The Restaurant at the End of the Universe";
const SALMON: &str = "The Salmon of Doubt";

/// Douglas Adams quotes inserted on first run.
pub const SEED_QUOTES: &[SeedQuote] = &[
    SeedQuote {
        text: "The answer to the great question of life, the universe and everything is forty-two.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["philosophy", "humor", "existence", "famous"],
    },
    SeedQuote {
        text: "Don't Panic.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["humor", "life", "wisdom", "famous"],
    },
    SeedQuote {
        text: "Time is an illusion. Lunchtime doubly so.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["philosophy", "humor", "time", "absurdism"],
    },
    SeedQuote {
        text: "In the beginning the Universe was created. This has made a lot of people very angry and been widely regarded as a bad move.",
        author: ADAMS,
        source: RESTAURANT,
        year: 1980,
        tags: &["philosophy", "humor", "existence", "satire"],
    },
    SeedQuote {
        text: "I may not have gone where I intended to go, but I think I have ended up where I needed to be.",
        author: ADAMS,
        source: "The Long Dark Tea-Time of the Soul",
        year: 1988,
        tags: &["life", "wisdom", "philosophy", "journey"],
    },
    SeedQuote {
        text: "A learning experience is one of those things that says, 'You know that thing you just did? Don't do that.'",
        author: ADAMS,
        source: SALMON,
        year: 2002,
        tags: &["wisdom", "humor", "life", "learning"],
    },
    SeedQuote {
        text: "I love deadlines. I love the whooshing noise they make as they go by.",
        author: ADAMS,
        source: SALMON,
        year: 2002,
        tags: &["humor", "life", "work", "procrastination"],
    },
    SeedQuote {
        text: "The fact that we live at the bottom of a deep gravity well, on the surface of a gas covered planet going around a nuclear fireball 90 million miles away and think this to be normal is obviously some indication of how skewed our perspective tends to be.",
        author: ADAMS,
        source: SALMON,
        year: 2002,
        tags: &["philosophy", "science", "perspective", "existence"],
    },
    SeedQuote {
        text: "For instance, on the planet Earth, man had always assumed that he was more intelligent than dolphins because he had achieved so much\u{2014}the wheel, New York, wars and so on\u{2014}whilst all the dolphins had ever done was muck about in the water having a good time. But conversely, the dolphins had always believed that they were far more intelligent than man\u{2014}for precisely the same reasons.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["philosophy", "humor", "intelligence", "perspective", "satire"],
    },
    SeedQuote {
        text: "Let's think the unthinkable, let's do the undoable. Let us prepare to grapple with the ineffable itself, and see if we may not eff it after all.",
        author: ADAMS,
        source: "Dirk Gently's Holistic Detective Agency",
        year: 1987,
        tags: &["philosophy", "humor", "language", "challenge"],
    },
    SeedQuote {
        text: "There is a theory which states that if ever anyone discovers exactly what the Universe is for and why it is here, it will instantly disappear and be replaced by something even more bizarre and inexplicable. There is another theory which states that this has already happened.",
        author: ADAMS,
        source: RESTAURANT,
        year: 1980,
        tags: &["philosophy", "humor", "existence", "mystery", "absurdism"],
    },
    SeedQuote {
        text: "We demand rigidly defined areas of doubt and uncertainty!",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["humor", "philosophy", "certainty", "absurdism"],
    },
    SeedQuote {
        text: "It is a mistake to think you can solve any major problems just with potatoes.",
        author: ADAMS,
        source: "Life, the Universe and Everything",
        year: 1982,
        tags: &["humor", "wisdom", "absurdism"],
    },
    SeedQuote {
        text: "Anyone who is capable of getting themselves made President should on no account be allowed to do the job.",
        author: ADAMS,
        source: RESTAURANT,
        year: 1980,
        tags: &["politics", "humor", "satire", "wisdom"],
    },
    SeedQuote {
        text: "Nothing travels faster than the speed of light, with the possible exception of bad news, which obeys its own special laws.",
        author: ADAMS,
        source: "Mostly Harmless",
        year: 1992,
        tags: &["humor", "science", "absurdism"],
    },
    SeedQuote {
        text: "The ships hung in the sky in much the same way that bricks don't.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["humor", "science-fiction", "imagery", "absurdism"],
    },
    SeedQuote {
        text: "If there's anything more important than my ego around, I want it caught and shot now.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["humor", "ego", "satire", "character"],
    },
    SeedQuote {
        text: "Human beings, who are almost unique in having the ability to learn from the experience of others, are also remarkable for their apparent disinclination to do so.",
        author: ADAMS,
        source: "Last Chance to See",
        year: 1990,
        tags: &["wisdom", "philosophy", "human-nature", "learning"],
    },
    SeedQuote {
        text: "I'd far rather be happy than right any day.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["wisdom", "life", "happiness", "philosophy"],
    },
    SeedQuote {
        text: "The mere thought hadn't even begun to speculate about the merest possibility of crossing my mind.",
        author: ADAMS,
        source: HITCHHIKER,
        year: 1979,
        tags: &["humor", "language", "absurdism"],
    },
];

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Quotes inserted by this call.
    pub added: usize,
    /// Quotes present after the call.
    pub total: u64,
}

impl SeedQuote {
    fn to_new_quote(&self) -> NewQuote {
        NewQuote {
            text: self.text.into(),
            author: self.author.into(),
            source: Some(self.source.into()),
            year: Some(self.year),
            tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

/// Insert [`SEED_QUOTES`] unless the store already holds quotes.
///
/// `force` skips the emptiness check. The whole set lands in one transaction.
pub fn seed_database(store: &QuoteStore, force: bool) -> Result<SeedOutcome, StorageError> {
    if !force && store.is_seeded()? {
        let total = store.quote_count()?;
        tracing::debug!(total, "Vault already populated; skipping seed");
        return Ok(SeedOutcome { added: 0, total });
    }

    let batch: Vec<NewQuote> = SEED_QUOTES.iter().map(SeedQuote::to_new_quote).collect();
    let added = store.add_quotes(&batch)?.len();
    let total = store.quote_count()?;
    tracing::info!(added, total, "Seeded quote vault");
    Ok(SeedOutcome { added, total })
}
