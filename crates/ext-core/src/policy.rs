//! Validation policy data
//!
//! The closed category set and the repository-name exception list are
//! injected into the rule registry at construction rather than read as
//! ambient globals, so tests and downstream indexes can swap in alternate
//! policy sets.

use std::collections::BTreeSet;

/// Accepted extension categories.
const DEFAULT_CATEGORIES: &[&str] = &[
    "Active Learning",
    "Cardiac",
    "Chest Imaging Platform",
    "Developer Tools",
    "Diffusion",
    "Examples",
    "Exporter",
    "Filtering",
    "IGT",
    "Informatics",
    "Legacy",
    "Neuroimaging",
    "Nuclear Medicine",
    "Orthodontics",
    "Otolaryngology",
    "Photogrammetry",
    "Printing",
    "Quantification",
    "Radiotherapy",
    "Registration",
    "Remote",
    "Rendering",
    "Segmentation",
    "Sequences",
    "Shape Analysis",
    "Simulation",
    "SlicerMorph",
    "Spectroscopy",
    "Surface Models",
    "Tractography",
    "Training",
    "Utilities",
    "Vascular Modeling Toolkit",
    "Virtual Reality",
    "Web System Tools",
];

/// Repositories exempt from the naming convention check.
const REPOSITORY_NAME_EXCEPTIONS: &[&str] = &[
    "3DMetricTools",
    "ai-assisted-annotation-client",
    "aigt",
    "AnglePlanes-Extension",
    "AnomalousFiltersExtension",
    "BoneTextureExtension",
    "CarreraSlice",
    "ChangeTrackerPy",
    "CMFreg",
    "CurveMaker",
    "DatabaseInteractorExtension",
    "dcmqi",
    "DSC_Analysis",
    "EasyClip-Extension",
    "ErodeDilateLabel",
    "FilmDosimetryAnalysis",
    "GelDosimetryAnalysis",
    "GyroGuide",
    "iGyne",
    "ImageMaker",
    "IntensitySegmenter",
    "MeshStatisticsExtension",
    "MeshToLabelMap",
    "ModelClip",
    "MONAILabel",
    "mpReview",
    "NeedleFinder",
    "opendose3d",
    "OsteotomyPlanner",
    "PBNRR",
    "PedicleScrewSimulator",
    "PercutaneousApproachAnalysis",
    "PerkTutor",
    "PET-IndiC",
    "PETLiverUptakeMeasurement",
    "PETTumorSegmentation",
    "PickAndPaintExtension",
    "PkModeling",
    "PortPlacement",
    "Q3DCExtension",
    "QuantitativeReporting",
    "ResectionPlanner",
    "ScatteredTransform",
    "Scoliosis",
    "SegmentationAidedRegistration",
    "SegmentationReview",
    "SegmentRegistration",
    "ShapePopulationViewer",
    "ShapeRegressionExtension",
    "ShapeVariationAnalyzer",
    "SkullStripper",
    "SNRMeasurement",
    "SPHARM-PDM",
    "T1Mapping",
    "TCIABrowser",
    "ukftractography",
    "VASSTAlgorithms",
];

/// Immutable policy data consulted by the rule bodies.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    categories: BTreeSet<String>,
    repository_name_exceptions: BTreeSet<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            repository_name_exceptions: REPOSITORY_NAME_EXCEPTIONS
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

impl ValidationPolicy {
    /// Replace the category allow-list.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the repository-name exception list.
    pub fn with_repository_name_exceptions<I, S>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repository_name_exceptions = exceptions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `category` belongs to the allow-list.
    pub fn allows_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// The full allow-list, comma-joined, for remediation hints.
    pub fn categories_hint(&self) -> String {
        self.categories
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether `repo_name` is exempt from the naming convention.
    pub fn is_repository_name_exception(&self, repo_name: &str) -> bool {
        self.repository_name_exceptions.contains(repo_name)
    }
}
