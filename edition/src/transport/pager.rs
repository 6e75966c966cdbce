//! Greedy size-budgeted packing of sections into transport pages.

use common::{
    Section, Supplement, TransportConfig, DEFAULT_SECTION_OVERHEAD, DEFAULT_SUPPLEMENT_BOUND,
    DEFAULT_TRANSPORT_BUDGET,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Soft cap on the estimated size of one page
    pub budget: usize,
    /// Looser cap used when deciding whether the supplement joins the last page
    pub supplement_bound: usize,
    /// Fixed per-section cost of the transport's structural wrapper
    pub section_overhead: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_TRANSPORT_BUDGET,
            supplement_bound: DEFAULT_SUPPLEMENT_BOUND,
            section_overhead: DEFAULT_SECTION_OVERHEAD,
        }
    }
}

impl From<&TransportConfig> for PagerConfig {
    fn from(config: &TransportConfig) -> Self {
        Self {
            budget: config.budget(),
            supplement_bound: config.supplement_bound(),
            section_overhead: config.section_overhead(),
        }
    }
}

/// One chat message worth of sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportPage {
    pub sections: Vec<Section>,
    pub supplement: Option<Supplement>,
    /// Sum of the estimates of everything on the page
    pub estimated_size: usize,
}

/// Estimated serialized size of a section, in characters.
pub fn estimate(section: &Section, overhead: usize) -> usize {
    section.title.chars().count() + section.body.chars().count() + overhead
}

pub fn estimate_supplement(supplement: &Supplement, overhead: usize) -> usize {
    supplement.title.chars().count() + supplement.content.chars().count() + overhead
}

/// Pack `sections` in order, closing a page before a section would push it
/// past `budget`. A section larger than `budget` on its own still gets a page.
pub fn paginate_for_transport(sections: &[Section], budget: usize, overhead: usize) -> Vec<TransportPage> {
    let mut pages = Vec::new();
    let mut current = TransportPage::default();

    for section in sections {
        let size = estimate(section, overhead);
        if current.estimated_size + size > budget && !current.sections.is_empty() {
            pages.push(std::mem::take(&mut current));
        }
        if size > budget {
            warn!(
                title = %section.title,
                estimate = size,
                budget,
                "section exceeds transport budget, placing it alone"
            );
        }
        current.sections.push(section.clone());
        current.estimated_size += size;
    }

    if !current.sections.is_empty() {
        pages.push(current);
    }
    debug!(sections = sections.len(), pages = pages.len(), "transport pages packed");
    pages
}

/// Put the supplement on the last page when the combined estimate stays under
/// `bound`, otherwise on a page of its own.
pub fn attach_supplement(pages: &mut Vec<TransportPage>, supplement: &Supplement, bound: usize, overhead: usize) {
    let size = estimate_supplement(supplement, overhead);
    match pages.last_mut() {
        Some(last) if last.estimated_size + size < bound => {
            last.supplement = Some(supplement.clone());
            last.estimated_size += size;
        }
        _ => pages.push(TransportPage {
            sections: Vec::new(),
            supplement: Some(supplement.clone()),
            estimated_size: size,
        }),
    }
}

/// Full transport page set: packed sections plus the optional supplement.
pub fn build_pages(sections: &[Section], supplement: Option<&Supplement>, config: &PagerConfig) -> Vec<TransportPage> {
    let mut pages = paginate_for_transport(sections, config.budget, config.section_overhead);
    if let Some(supplement) = supplement {
        attach_supplement(&mut pages, supplement, config.supplement_bound, config.section_overhead);
    }
    pages
}
