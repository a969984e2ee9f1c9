//! `restock-analytics`
//!
//! **Responsibility:** turns catalog snapshots and demand history into graded,
//! forecast, ranked replenishment decisions.
//!
//! - ABC/XYZ classification and grade refresh
//! - Reorder recommendations and two priority-scoring schemes
//! - Inventory optimization advisories and KPI improvement proposals
//! - Batch pipeline on a bounded worker pool, plus tenant-bound jobs
//!
//! Storage-agnostic: callers hand in snapshots and persist whatever comes out.

pub mod classification;
pub mod config;
pub mod error;
pub mod job;
pub mod jobs;
pub mod kpi;
pub mod optimization;
pub mod pipeline;
pub mod recommendation;
pub mod scoring;

pub use classification::{
    AbcInput, AbcResult, AbcThresholds, CatalogClassificationInput, Classification,
    ClassificationResult, ClassificationThresholds, NEW_ITEM_THRESHOLD_MONTHS, XyzInput, XyzResult,
    XyzThresholds, abc_analysis, classify_catalog, combine, grade_for, management_strategy,
    xyz_analysis,
};
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use job::{AnalyticsJob, TenantRunner};
pub use jobs::{ClassificationJob, ForecastJob, ReplenishmentJob};
pub use kpi::{
    ImprovementProposal, Kpi, KpiCategory, KpiSnapshot, ProposalKind, filter_proposals_by_category,
    improvement_proposals, sort_proposals_by_priority,
};
pub use optimization::{
    Advisory, AdvisoryKind, AdvisoryPriority, InventoryOptimizer, OptimizationInput,
    OptimizationSummary, summarize,
};
pub use pipeline::{
    BatchReport, BatchRequest, ItemFailure, ItemForecast, ItemInput, PolicySource,
    RankedRecommendation, ReplenishmentPipeline,
};
pub use recommendation::{
    RecommendationEngine, ReorderRecommendation, SupplierSummary, filter_by_abc_grade,
    filter_by_urgency,
};
pub use scoring::{
    OrderScorer, OrderScoringInput, PriorityTier, RankedScore, RankingScheme, ScoreBreakdown,
    ScoringResult, UNKNOWN_GRADE_PRIORITY, UNKNOWN_GRADE_SCORE, filter_by_tier, reorder_priority,
    urgent_orders,
};
