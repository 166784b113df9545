//! Derived numeric scales for the rendering collaborator.

// ---------------------------------------------------------------------------
// Domain – inclusive [min, max] of a magnitude channel
// ---------------------------------------------------------------------------

/// Inclusive numeric domain. Empty input gets the safe default `[0, 1]` so
/// downstream scales never divide by a zero-width domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Domain { min: 0.0, max: 1.0 }
    }
}

impl Domain {
    /// [min, max] over the values; non-finite values are ignored.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        match bounds {
            Some((min, max)) => Domain { min, max },
            None => Domain::default(),
        }
    }

    /// Map `v` linearly onto `[lo, hi]`. A zero-width domain pins every
    /// value to the midpoint of the range instead of producing NaN.
    pub fn project(&self, v: f64, lo: f64, hi: f64) -> f64 {
        if self.max == self.min {
            return (lo + hi) / 2.0;
        }
        lo + (v - self.min) / (self.max - self.min) * (hi - lo)
    }
}

/// Color-ramp domain for the heatmap: always anchored at zero, with a floor
/// of one so an all-zero filter result still yields a usable ramp.
pub fn count_domain(counts: impl IntoIterator<Item = u64>) -> Domain {
    let max = counts.into_iter().max().unwrap_or(0).max(1);
    Domain {
        min: 0.0,
        max: max as f64,
    }
}

// ---------------------------------------------------------------------------
// Fixed visual ranges
// ---------------------------------------------------------------------------

/// Word-cloud font sizes in px.
pub const WORD_SIZE_RANGE: (f64, f64) = (12.0, 60.0);

/// Font size for a word of `weight` within the current weight domain.
pub fn word_size(domain: Domain, weight: f64) -> f64 {
    domain.project(weight, WORD_SIZE_RANGE.0, WORD_SIZE_RANGE.1)
}

/// Network node radius: 5 px base plus up to 20 px proportional to the
/// node's share of the maximum study count.
pub fn node_radius(studies: u64, max_studies: u64) -> f64 {
    let max = max_studies.max(1);
    5.0 + (studies as f64 / max as f64) * 20.0
}
