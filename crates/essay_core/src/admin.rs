use crate::BusyTask;

/// Corpus structure percentages reported by the analysis endpoint.
/// A percentage the service did not report usably is `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureBlueprint {
    pub q1_percentage: Option<f64>,
    pub q2_percentage: Option<f64>,
    pub q3_percentage: Option<f64>,
}

/// Body of a successful analysis call; either branch may be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    pub blueprint: Option<StructureBlueprint>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Blueprint(Option<StructureBlueprint>),
    Failed(String),
}

/// State behind the corpus screen: stats counter, bulk ingestion, analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminState {
    pub(crate) essay_count: Option<u64>,
    pub(crate) ingest: BusyTask,
    pub(crate) analysis_task: BusyTask,
    pub(crate) analysis: Option<AnalysisOutcome>,
}

impl AdminState {
    pub fn essay_count(&self) -> Option<u64> {
        self.essay_count
    }

    pub fn ingest(&self) -> &BusyTask {
        &self.ingest
    }

    pub fn analysis_task(&self) -> &BusyTask {
        &self.analysis_task
    }

    pub fn analysis(&self) -> Option<&AnalysisOutcome> {
        self.analysis.as_ref()
    }
}
