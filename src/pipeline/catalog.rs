use std::collections::HashMap;

use crate::ats::{Stage, StageId};

use super::BoardError;

/// Bidirectional mapping between stage display names and remote stage ids,
/// scoped to one role's pipeline.
///
/// Built once per board session from the remote stage list and immutable
/// thereafter. Lookup misses are programming-level failures: the caller
/// passed a name or id that is not part of this pipeline.
#[derive(Debug, Clone)]
pub struct StageCatalog {
    ordered: Vec<Stage>,
    id_by_name: HashMap<String, StageId>,
    name_by_id: HashMap<StageId, String>,
}

impl StageCatalog {
    /// Stage names must be unique within one role and ids unique remotely;
    /// a duplicate of either aborts construction.
    pub fn from_stages(stages: Vec<Stage>) -> Result<Self, BoardError> {
        let mut id_by_name = HashMap::with_capacity(stages.len());
        let mut name_by_id = HashMap::with_capacity(stages.len());

        for stage in &stages {
            if id_by_name
                .insert(stage.name.clone(), stage.id.clone())
                .is_some()
            {
                return Err(BoardError::DuplicateStage(stage.name.clone()));
            }
            if name_by_id
                .insert(stage.id.clone(), stage.name.clone())
                .is_some()
            {
                return Err(BoardError::DuplicateStage(stage.id.0.clone()));
            }
        }

        Ok(Self {
            ordered: stages,
            id_by_name,
            name_by_id,
        })
    }

    pub fn id_for(&self, name: &str) -> Result<&StageId, BoardError> {
        self.id_by_name
            .get(name)
            .ok_or_else(|| BoardError::UnknownStage(name.to_string()))
    }

    pub fn name_for(&self, id: &StageId) -> Result<&str, BoardError> {
        self.name_by_id
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| BoardError::UnknownStage(id.0.clone()))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.id_by_name.contains_key(name)
    }

    /// Stage names in the order the remote system lists them.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|stage| stage.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
