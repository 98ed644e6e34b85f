//! Accumulates features while the freeform parser walks the features section

use tracing::debug;

use crate::domain::entities::Feature;

#[derive(Debug, Default)]
pub struct FeatureBlock {
    current: Option<Feature>,
    finished: Vec<Feature>,
}

impl FeatureBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the in-progress feature, if any
    pub fn flush(&mut self) {
        if let Some(feature) = self.current.take() {
            self.finished.push(feature);
        }
    }

    pub fn start(&mut self, feature: Feature) {
        self.flush();
        self.current = Some(feature);
    }

    /// Append a line to the in-progress feature's description
    pub fn continue_with(&mut self, line: &str) {
        match self.current.as_mut() {
            Some(feature) => feature.append_line(line),
            None => debug!(line, "Dropping line with no feature to continue"),
        }
    }

    pub fn finish(mut self) -> Vec<Feature> {
        self.flush();
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FeatureType;

    #[test]
    fn test_continuation_joins_with_newline() {
        let mut block = FeatureBlock::new();
        block.start(Feature::new("Bite", FeatureType::Action, "Deal 1d8 damage."));
        block.continue_with("The target is Restrained.");
        block.start(Feature::new("Hide", FeatureType::Passive, ""));

        let features = block.finish();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].description, "Deal 1d8 damage.\nThe target is Restrained.");
        assert_eq!(features[1].name, "Hide");
    }

    #[test]
    fn test_orphan_lines_are_dropped() {
        let mut block = FeatureBlock::new();
        block.continue_with("nobody owns this line");
        assert!(block.finish().is_empty());
    }
}
