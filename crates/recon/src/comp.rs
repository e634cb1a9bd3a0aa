use serde::Serialize;

/// Margin percent assumed for quote-time estimation when the item carries no
/// actual line margin.
pub const DEFAULT_ASSUMED_MARGIN_PCT: f64 = 20.0;

/// Flat rate applied to the existing-MRR portion of an uptick split, and to
/// upsells/renewals with no uptick.
const FLAT_RENEWAL_RATE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Revenue / renewal types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueType {
    New,
    NetNew,
    Upsell,
    Renewal,
    /// Anything the CRM sends that we don't recognize. Calculates to zero
    /// comp rather than failing a whole list render.
    #[default]
    Unknown,
}

impl RevenueType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "net new" | "net-new" | "netnew" => Self::NetNew,
            "upsell" => Self::Upsell,
            "renewal" => Self::Renewal,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for RevenueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::NetNew => write!(f, "Net New"),
            Self::Upsell => write!(f, "Upsell"),
            Self::Renewal => write!(f, "Renewal"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Either a won-service record (actual term, margin, TCV, uptick) or a quote
/// line item (assumed margin supplied by the caller, existing MRR optional).
/// Pure calculation argument, never persisted.
#[derive(Debug, Clone, Default)]
pub struct CompInput {
    pub revenue_type: RevenueType,
    /// Raw renewal type string; "Early Renewal" is contractually zero-comp.
    pub renewal_type: Option<String>,
    /// Contract term in months.
    pub term: f64,
    pub mrr: f64,
    /// Actual TCV when known; defaults to `mrr * term`.
    pub tcv: Option<f64>,
    /// Actual line margin as a fraction (0.35 = 35%). Present on won
    /// services, absent on quote line items.
    pub margin: Option<f64>,
    /// Explicit MRR uptick (won services).
    pub mrr_uptick: Option<f64>,
    /// Prior MRR (quote line items); uptick falls back to `mrr - existing`.
    pub existing_mrr: Option<f64>,
}

impl CompInput {
    fn tcv(&self) -> f64 {
        self.tcv.unwrap_or(self.mrr * self.term)
    }

    fn is_early_renewal(&self) -> bool {
        self.renewal_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("early renewal"))
    }

    fn uptick(&self) -> Option<f64> {
        self.mrr_uptick
            .or_else(|| self.existing_mrr.map(|existing| self.mrr - existing))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompResult {
    pub comp: f64,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Rate schedule
// ---------------------------------------------------------------------------

/// Tiered rate by margin percent. Step function, lower-inclusive bounds,
/// no interpolation. These numbers drive real payouts — any change here is a
/// commission-plan change, not a refactor.
pub fn rate_for_margin(margin_pct: f64) -> f64 {
    if margin_pct < 5.0 {
        0.0
    } else if margin_pct < 15.0 {
        0.06
    } else if margin_pct < 30.0 {
        0.10
    } else if margin_pct < 50.0 {
        0.14
    } else if margin_pct < 60.0 {
        0.20
    } else {
        0.22
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Expected compensation for one line item.
///
/// Margin source: the item's actual margin when present (won service),
/// otherwise `assumed_margin_pct` (quote-time path), defaulting to 20%.
/// Never panics; unrecognized revenue types produce zero comp with an
/// explanation so bulk summation over a dirty list still completes.
pub fn calculate_expected_comp(item: &CompInput, assumed_margin_pct: Option<f64>) -> CompResult {
    let margin_pct = match item.margin {
        Some(margin) => margin * 100.0,
        None => assumed_margin_pct.unwrap_or(DEFAULT_ASSUMED_MARGIN_PCT),
    };
    let rate = rate_for_margin(margin_pct);

    match item.revenue_type {
        RevenueType::New | RevenueType::NetNew => {
            let tcv = item.tcv();
            let comp = tcv * rate;
            CompResult {
                comp,
                explanation: format!(
                    "{}: TCV {tcv:.2} x {:.0}% (margin {margin_pct:.1}%) = {comp:.2}",
                    item.revenue_type,
                    rate * 100.0
                ),
            }
        }
        RevenueType::Upsell | RevenueType::Renewal => {
            if item.is_early_renewal() {
                return CompResult {
                    comp: 0.0,
                    explanation: "Early Renewal: no compensation".into(),
                };
            }

            match item.uptick() {
                Some(uptick) if uptick > 0.0 => {
                    let existing = item
                        .existing_mrr
                        .unwrap_or_else(|| (item.mrr - uptick).max(0.0));
                    let existing_comp = existing * item.term * FLAT_RENEWAL_RATE;
                    let uptick_comp = uptick * item.term * rate;
                    let comp = existing_comp + uptick_comp;
                    CompResult {
                        comp,
                        explanation: format!(
                            "Uptick split: existing {existing:.2} x {:.0} mo x 5% = {existing_comp:.2}; \
                             uptick {uptick:.2} x {:.0} mo x {:.0}% (margin {margin_pct:.1}%) = {uptick_comp:.2}",
                            item.term,
                            item.term,
                            rate * 100.0
                        ),
                    }
                }
                _ => {
                    let tcv = item.tcv();
                    let comp = tcv * FLAT_RENEWAL_RATE;
                    let label = if item.revenue_type == RevenueType::Upsell {
                        "Upsell (no uptick)"
                    } else {
                        "Regular Renewal"
                    };
                    CompResult {
                        comp,
                        explanation: format!("{label}: TCV {tcv:.2} x 5% = {comp:.2}"),
                    }
                }
            }
        }
        RevenueType::Unknown => CompResult {
            comp: 0.0,
            explanation: "No matching compensation rules".into(),
        },
    }
}
