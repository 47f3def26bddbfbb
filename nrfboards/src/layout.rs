//! Physical board layout for generated pinout diagrams.

use regex::Regex;
use serde::Serialize;
use std::{collections::BTreeMap, sync::OnceLock};

use crate::{
    board::LayoutSource,
    error::{Fault, Problem},
    PinTable,
};

/// Labels of this form name a GPIO and must exist on the board.
fn gpio_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^D\d+$").unwrap())
}

/// Pin labels along the board edges, in left-right or top-bottom order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardLayout {
    pub top: Vec<String>,
    pub bottom: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    /// Free text keyed by pin label.
    pub notes: BTreeMap<String, String>,
    /// Style fragment positioning the diagram.
    pub css: String,
}

impl BoardLayout {
    pub(crate) fn from_source(src: &LayoutSource, pins: &PinTable) -> Result<Self, Fault> {
        let labels = src.top.iter().chain(src.bottom).chain(src.left).chain(src.right);
        for label in labels.chain(src.notes.iter().map(|(label, _)| label)) {
            if gpio_label().is_match(label) && !pins.contains(label) {
                return Err(Problem::UnknownLayoutPin(label.to_string()).into());
            }
        }

        let owned = |labels: &[&str]| labels.iter().map(|l| l.to_string()).collect::<Vec<_>>();
        Ok(Self {
            top: owned(src.top),
            bottom: owned(src.bottom),
            left: owned(src.left),
            right: owned(src.right),
            notes: src.notes.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            css: src.css.to_string(),
        })
    }

    /// Edges with their labels, skipping empty ones.
    pub fn edges(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [("top", &self.top), ("bottom", &self.bottom), ("left", &self.left), ("right", &self.right)]
            .into_iter()
            .filter(|(_, labels)| !labels.is_empty())
            .map(|(edge, labels)| (edge, labels.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::PinBuilder;

    #[test]
    fn gpio_labels_must_exist() {
        let pins = PinBuilder::generate(0, 31).build();

        let src = LayoutSource {
            left: &["VDD", "GND", "", "D3", "D31"],
            notes: &[("D6", "Serial console RX")],
            ..Default::default()
        };
        let layout = BoardLayout::from_source(&src, &pins).unwrap();
        assert_eq!(layout.edges().count(), 1);
        assert_eq!(layout.notes["D6"], "Serial console RX");

        let src = LayoutSource { right: &["D32"], ..Default::default() };
        assert!(matches!(
            BoardLayout::from_source(&src, &pins),
            Err(Fault::Invalid(Problem::UnknownLayoutPin(label))) if label == "D32"
        ));

        let src = LayoutSource { notes: &[("D40", "nope")], ..Default::default() };
        assert!(BoardLayout::from_source(&src, &pins).is_err());
    }
}
