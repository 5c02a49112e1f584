//! `nearText` clause: concept search with optional move-to / move-away
//! adjustments.

use super::SimilarityOptions;
use crate::rpc::pb;
use crate::text;

/// Reference to an object used as a move anchor. Either field may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveObject {
    pub id: String,
    pub beacon: String,
}

impl MoveObject {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            beacon: String::new(),
        }
    }

    pub fn beacon(beacon: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            beacon: beacon.into(),
        }
    }

    fn to_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.id.is_empty() {
            parts.push(format!("id: {}", text::quote(&self.id)));
        }
        if !self.beacon.is_empty() {
            parts.push(format!("beacon: {}", text::quote(&self.beacon)));
        }
        format!("{{{}}}", parts.join(" "))
    }
}

/// Shift of the query vector toward (or away from) concepts and objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveParameters {
    pub concepts: Vec<String>,
    pub objects: Vec<MoveObject>,
    pub force: f32,
}

impl MoveParameters {
    pub fn new(force: f32) -> Self {
        Self {
            force,
            ..Default::default()
        }
    }

    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concepts = concepts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = MoveObject>) -> Self {
        self.objects = objects.into_iter().collect();
        self
    }

    fn to_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.concepts.is_empty() {
            parts.push(format!("concepts: {}", text::string_array(&self.concepts)));
        }
        if !self.objects.is_empty() {
            let objects: Vec<String> = self.objects.iter().map(MoveObject::to_text).collect();
            parts.push(format!("objects: [{}]", objects.join(", ")));
        }
        parts.push(format!("force: {}", self.force));
        format!("{{{}}}", parts.join(" "))
    }

    fn to_rpc(&self) -> pb::near_text_search::Move {
        let mut uuids = Vec::new();
        let mut beacons = Vec::new();
        for obj in &self.objects {
            if !obj.id.is_empty() {
                uuids.push(obj.id.clone());
            }
            if !obj.beacon.is_empty() {
                beacons.push(obj.beacon.clone());
            }
        }
        pb::near_text_search::Move {
            force: self.force,
            concepts: self.concepts.clone(),
            uuids,
            beacons,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearText {
    concepts: Vec<String>,
    move_to: Option<MoveParameters>,
    move_away_from: Option<MoveParameters>,
    autocorrect: Option<bool>,
    pub(crate) options: SimilarityOptions,
}

impl NearText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concepts = concepts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_move_to(mut self, params: MoveParameters) -> Self {
        self.move_to = Some(params);
        self
    }

    pub fn with_move_away_from(mut self, params: MoveParameters) -> Self {
        self.move_away_from = Some(params);
        self
    }

    pub fn with_autocorrect(mut self, autocorrect: bool) -> Self {
        self.autocorrect = Some(autocorrect);
        self
    }

    similarity_setters!();

    pub fn options(&self) -> &SimilarityOptions {
        &self.options
    }

    /// Clause body without the `nearText:` key, reused by hybrid sub-searches.
    pub(crate) fn to_text_body(&self) -> String {
        let mut parts = vec![format!("concepts: {}", text::string_array(&self.concepts))];
        parts.extend(self.options.threshold_text());
        if let Some(m) = &self.move_to {
            parts.push(format!("moveTo: {}", m.to_text()));
        }
        if let Some(m) = &self.move_away_from {
            parts.push(format!("moveAwayFrom: {}", m.to_text()));
        }
        if let Some(a) = self.autocorrect {
            parts.push(format!("autocorrect: {}", a));
        }
        parts.extend(self.options.targets_text());
        format!("{{{}}}", parts.join(" "))
    }

    pub fn to_text(&self) -> String {
        format!("nearText:{}", self.to_text_body())
    }

    pub fn to_rpc(&self) -> pb::NearTextSearch {
        let (target_vectors, targets) = self.options.rpc_targets();
        pb::NearTextSearch {
            query: self.concepts.clone(),
            certainty: self.options.certainty(),
            distance: self.options.distance(),
            move_to: self.move_to.as_ref().map(MoveParameters::to_rpc),
            move_away: self.move_away_from.as_ref().map(MoveParameters::to_rpc),
            autocorrect: self.autocorrect,
            target_vectors,
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::multi_target::MultiTarget;

    #[test]
    fn test_concepts_and_certainty() {
        let text = NearText::new()
            .with_concepts(["pizza", "pasta"])
            .with_certainty(0.7)
            .to_text();
        assert_eq!(text, "nearText:{concepts: [\"pizza\",\"pasta\"] certainty: 0.7}");
    }

    #[test]
    fn test_distance_replaces_certainty() {
        let text = NearText::new()
            .with_concepts(["a"])
            .with_certainty(0.7)
            .with_distance(0.3)
            .to_text();
        assert_eq!(text, "nearText:{concepts: [\"a\"] distance: 0.3}");
    }

    #[test]
    fn test_move_parameters() {
        let text = NearText::new()
            .with_concepts(["fashion"])
            .with_move_to(
                MoveParameters::new(0.85)
                    .with_concepts(["haute couture"])
                    .with_objects([MoveObject::id("abc")]),
            )
            .with_move_away_from(MoveParameters::new(0.45).with_concepts(["finance"]))
            .with_autocorrect(true)
            .to_text();
        assert_eq!(
            text,
            "nearText:{concepts: [\"fashion\"] \
             moveTo: {concepts: [\"haute couture\"] objects: [{id: \"abc\"}] force: 0.85} \
             moveAwayFrom: {concepts: [\"finance\"] force: 0.45} \
             autocorrect: true}"
        );
    }

    #[test]
    fn test_targets_render_last() {
        let text = NearText::new()
            .with_concepts(["a"])
            .with_target_vectors(["ignored"])
            .with_targets(MultiTarget::new().average(["t1", "t2"]))
            .with_certainty(0.5)
            .to_text();
        assert_eq!(
            text,
            "nearText:{concepts: [\"a\"] certainty: 0.5 targets:{combinationMethod: average targetVectors: [\"t1\",\"t2\"]}}"
        );
    }

    #[test]
    fn test_rpc() {
        let rpc = NearText::new()
            .with_concepts(["a"])
            .with_distance(0.2)
            .with_move_to(
                MoveParameters::new(1.0)
                    .with_objects([MoveObject::id("u1"), MoveObject::beacon("b1")]),
            )
            .with_target_vectors(["v"])
            .to_rpc();
        assert_eq!(rpc.query, vec!["a"]);
        assert_eq!(rpc.certainty, None);
        assert_eq!(rpc.distance, Some(0.2));
        let mv = rpc.move_to.expect("move_to set");
        assert_eq!(mv.uuids, vec!["u1"]);
        assert_eq!(mv.beacons, vec!["b1"]);
        assert_eq!(rpc.target_vectors, vec!["v"]);
        assert!(rpc.targets.is_none());
    }
}
