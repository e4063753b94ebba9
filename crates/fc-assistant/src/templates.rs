//! Local reply templates, used when no remote model is configured or the
//! remote call fails.
//!
//! Each intent has two phrasings. Which one is used comes from a
//! [`RandomSource`], so tests and deployments that want stable replies can
//! inject a seeded or fixed source.

use std::fmt::Write;
use std::sync::{Arc, Mutex, PoisonError};

use fc_core::entities::FeatureRequest;
use fc_core::enums::Intent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::context::ContextBundle;
use crate::prompt::format_hours;

/// Variants per intent.
pub const TEMPLATE_VARIANTS: usize = 2;

/// Items listed by name in a template reply.
pub const PREVIEW_ITEMS: usize = 3;

/// Last-resort reply when nothing else can be produced.
pub const APOLOGY: &str =
    "Beklager, jeg kunne ikke behandle din forespørgsel lige nu. Prøv igen om lidt.";

// ── Random source ──────────────────────────────────────────────────

/// Chooses a template variant.
pub trait RandomSource: Send + Sync {
    /// An index in `0..len`. `len` is at least 1.
    fn pick(&self, len: usize) -> usize;
}

/// [`RandomSource`] over a mutex-guarded [`StdRng`].
pub struct RngSource {
    rng: Mutex<StdRng>,
}

impl RngSource {
    /// Deterministic sequence for a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// `seeded` when a seed is given, `from_os` otherwise.
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl RandomSource for RngSource {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }
}

/// Always returns the same variant. Out-of-range indexes are clamped.
pub struct FixedSource(pub usize);

impl RandomSource for FixedSource {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

// ── Renderer ───────────────────────────────────────────────────────

pub struct TemplateRenderer {
    random: Arc<dyn RandomSource>,
}

impl TemplateRenderer {
    #[must_use]
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Render the reply for `intent` from `bundle`.
    ///
    /// Bugs, features, knowledge and time look only at their own collection;
    /// when it is empty the intent's "no results" reply is used. Team and
    /// general look at the whole bundle.
    #[must_use]
    pub fn render(&self, query: &str, intent: Intent, bundle: &ContextBundle) -> String {
        let has_data = match intent {
            Intent::Bugs => !bundle.bugs.is_empty(),
            Intent::Features => !bundle.features.is_empty(),
            Intent::Knowledge => !bundle.knowledge.is_empty(),
            Intent::Time => !bundle.time_logs.is_empty(),
            Intent::Team | Intent::General => !bundle.is_empty(),
        };
        if !has_data {
            return no_results(intent).to_string();
        }

        let variant = self.random.pick(TEMPLATE_VARIANTS).min(TEMPLATE_VARIANTS - 1);
        let body = match intent {
            Intent::Bugs => bugs(variant, bundle),
            Intent::Features => features(variant, bundle),
            Intent::Knowledge => knowledge(variant, bundle),
            Intent::Time => time(variant, bundle),
            Intent::Team => team(variant, bundle),
            Intent::General => general(variant, bundle),
        };

        if bundle.matched {
            body
        } else {
            format!(
                "Jeg fandt intet, der matcher \"{}\" direkte, så her er de seneste poster.\n\n{body}",
                query.trim()
            )
        }
    }
}

/// Reply for an intent with nothing to show. Each suggests a creation action.
#[must_use]
pub const fn no_results(intent: Intent) -> &'static str {
    match intent {
        Intent::Bugs => {
            "Jeg fandt ingen bugs, der matcher din forespørgsel. Vil du oprette en ny bug-rapport?"
        }
        Intent::Features => {
            "Jeg fandt ingen feature-ønsker om det. Vil du oprette et nyt feature-ønske, så teamet kan stemme på det?"
        }
        Intent::Knowledge => {
            "Jeg fandt ingen viden om det i vidensbasen. Overvej at oprette en ny videnscase, så teamet kan finde svaret næste gang."
        }
        Intent::Time => {
            "Der er ingen tidsregistreringer endnu. Registrér dine timer for at få et overblik over teamets arbejde."
        }
        Intent::Team => {
            "Der er ingen aktivitet i teamet endnu. Kom i gang ved at oprette en bug, et feature-ønske eller en videnscase."
        }
        Intent::General => {
            "Jeg fandt ingen data for dit team endnu. Opret en bug, et feature-ønske eller en videnscase, så kan jeg hjælpe dig bedre."
        }
    }
}

// ── Per-intent templates ───────────────────────────────────────────

fn bugs(variant: usize, bundle: &ContextBundle) -> String {
    let n = bundle.bugs.len();
    let mut list = String::new();
    for bug in bundle.bugs.iter().take(PREVIEW_ITEMS) {
        let _ = writeln!(list, "• {} ({}, {})", bug.title, bug.status, bug.priority);
    }
    if variant == 0 {
        let active = bundle.bugs.iter().filter(|b| b.status.is_active()).count();
        format!(
            "Jeg fandt {} for dit team:\n{list}\n{active} af dem er stadig åbne eller under arbejde.",
            plural(n, "bug", "bugs")
        )
    } else {
        format!(
            "Her er {}, der passer til din forespørgsel:\n{list}{}",
            plural(n, "bug", "bugs"),
            more(n)
        )
    }
}

fn features(variant: usize, bundle: &ContextBundle) -> String {
    let n = bundle.features.len();
    let mut list = String::new();
    for feature in bundle.features.iter().take(PREVIEW_ITEMS) {
        let _ = writeln!(
            list,
            "• {} ({}, {})",
            feature.title,
            feature.status,
            plural(feature.votes as usize, "stemme", "stemmer")
        );
    }
    if variant == 0 {
        format!("Der er {}:\n{list}{}", plural(n, "feature-ønske", "feature-ønsker"), more(n))
    } else {
        let top = most_voted(&bundle.features).map_or_else(String::new, |f| {
            format!(
                " Det mest populære er \"{}\" med {}.",
                f.title,
                plural(f.votes as usize, "stemme", "stemmer")
            )
        });
        format!(
            "Jeg fandt {}.{top}\n{list}",
            plural(n, "feature-ønske", "feature-ønsker")
        )
    }
}

fn knowledge(variant: usize, bundle: &ContextBundle) -> String {
    let n = bundle.knowledge.len();
    if variant == 0 {
        let mut list = String::new();
        for case in bundle.knowledge.iter().take(PREVIEW_ITEMS) {
            let _ = writeln!(list, "• {} ({})", case.title, case.category);
        }
        format!(
            "Jeg fandt {}, der kan hjælpe:\n{list}{}",
            plural(n, "videnscase", "videnscases"),
            more(n)
        )
    } else {
        let first = &bundle.knowledge[0];
        format!(
            "Vidensbasen har {}. Start med \"{}\":\n{}",
            plural(n, "relevant artikel", "relevante artikler"),
            first.title,
            excerpt(&first.content, 200)
        )
    }
}

fn time(variant: usize, bundle: &ContextBundle) -> String {
    let n = bundle.time_logs.len();
    let total = format_hours(bundle.total_hours());
    let mut list = String::new();
    for log in bundle.time_logs.iter().take(PREVIEW_ITEMS) {
        let _ = writeln!(
            list,
            "• {}: {} timer, {}",
            log.date,
            format_hours(log.hours),
            log.description
        );
    }
    if variant == 0 {
        format!(
            "Der er registreret {total} timer i alt fordelt på {}.\n{list}",
            plural(n, "registrering", "registreringer")
        )
    } else {
        format!(
            "I alt {total} timer på tværs af {}. De seneste:\n{list}",
            plural(n, "tidsregistrering", "tidsregistreringer")
        )
    }
}

fn team(variant: usize, bundle: &ContextBundle) -> String {
    if variant == 0 {
        format!(
            "Teamoverblik: {}, {}, {} og {}.",
            plural(bundle.bugs.len(), "bug", "bugs"),
            plural(bundle.features.len(), "feature-ønske", "feature-ønsker"),
            plural(bundle.knowledge.len(), "videnscase", "videnscases"),
            plural(bundle.time_logs.len(), "tidsregistrering", "tidsregistreringer")
        )
    } else {
        format!(
            "Her er hvad teamet arbejder med lige nu:\n• Bugs: {}\n• Feature-ønsker: {}\n• Videnscases: {}\n• Registrerede timer: {}",
            bundle.bugs.len(),
            bundle.features.len(),
            bundle.knowledge.len(),
            format_hours(bundle.total_hours())
        )
    }
}

fn general(variant: usize, bundle: &ContextBundle) -> String {
    if variant == 0 {
        format!(
            "Jeg kan hjælpe med bugs, feature-ønsker, vidensbasen og tidsregistrering. \
             Blandt teamets seneste poster er der {}, {}, {} og {}.",
            plural(bundle.bugs.len(), "bug", "bugs"),
            plural(bundle.features.len(), "feature-ønske", "feature-ønsker"),
            plural(bundle.knowledge.len(), "videnscase", "videnscases"),
            plural(bundle.time_logs.len(), "tidsregistrering", "tidsregistreringer")
        )
    } else {
        let mut latest = String::new();
        if let Some(bug) = bundle.bugs.first() {
            let _ = writeln!(latest, "• Seneste bug: {}", bug.title);
        }
        if let Some(feature) = bundle.features.first() {
            let _ = writeln!(latest, "• Seneste feature-ønske: {}", feature.title);
        }
        if let Some(case) = bundle.knowledge.first() {
            let _ = writeln!(latest, "• Seneste videnscase: {}", case.title);
        }
        if let Some(log) = bundle.time_logs.first() {
            let _ = writeln!(
                latest,
                "• Seneste registrering: {} timer, {}",
                format_hours(log.hours),
                log.description
            );
        }
        format!(
            "Hej! Spørg mig fx om åbne bugs, populære feature-ønsker, guides i vidensbasen eller dine timer.\n\n{latest}"
        )
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

fn more(n: usize) -> String {
    if n > PREVIEW_ITEMS {
        format!("… og {} mere.", n - PREVIEW_ITEMS)
    } else {
        String::new()
    }
}

/// First feature with the highest vote count.
fn most_voted(features: &[FeatureRequest]) -> Option<&FeatureRequest> {
    features
        .iter()
        .fold(None, |best: Option<&FeatureRequest>, f| match best {
            Some(b) if b.votes >= f.votes => Some(b),
            _ => Some(f),
        })
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
