use std::fmt;

use serde::{Deserialize, Serialize};

/// Topic label attached to every record. Closed set.
///
/// Variant order matches [`TOPIC_TABLE`] followed by the `General` fallback,
/// so the derived `Ord` doubles as the classifier's precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Storage,
    Compute,
    Database,
    Networking,
    Security,
    Analytics,
    Migration,
    #[serde(rename = "High Availability")]
    HighAvailability,
    General,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Storage => "Storage",
            Topic::Compute => "Compute",
            Topic::Database => "Database",
            Topic::Networking => "Networking",
            Topic::Security => "Security",
            Topic::Analytics => "Analytics",
            Topic::Migration => "Migration",
            Topic::HighAvailability => "High Availability",
            Topic::General => "General",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered keyword table. The first topic with any matching keyword wins,
/// so a text mentioning both S3 and EC2 is Storage.
///
/// Keywords are lower-case literal substrings, not words: "nat" also hits
/// "alternative". Changing this table changes classification of existing data.
pub const TOPIC_TABLE: &[(Topic, &[&str])] = &[
    (
        Topic::Storage,
        &[
            "s3",
            "ebs",
            "efs",
            "glacier",
            "storage gateway",
            "snowball",
            "fsx",
            "backup",
        ],
    ),
    (
        Topic::Compute,
        &[
            "ec2",
            "lambda",
            "ecs",
            "eks",
            "fargate",
            "auto scaling",
            "batch",
            "instance",
        ],
    ),
    (
        Topic::Database,
        &[
            "rds",
            "dynamodb",
            "aurora",
            "elasticache",
            "redshift",
            "documentdb",
            "database",
        ],
    ),
    (
        Topic::Networking,
        &[
            "vpc",
            "cloudfront",
            "route 53",
            "direct connect",
            "transit gateway",
            "nat",
            "subnet",
        ],
    ),
    (
        Topic::Security,
        &[
            "iam",
            "kms",
            "waf",
            "shield",
            "cognito",
            "secrets manager",
            "security",
            "encryption",
        ],
    ),
    (
        Topic::Analytics,
        &[
            "athena",
            "emr",
            "kinesis",
            "quicksight",
            "glue",
            "opensearch",
            "analytics",
        ],
    ),
    (
        Topic::Migration,
        &[
            "dms",
            "migration",
            "datasync",
            "transfer",
            "snowball",
            "migrate",
        ],
    ),
    (
        Topic::HighAvailability,
        &[
            "multi-az",
            "load balancer",
            "disaster",
            "failover",
            "replication",
            "availability",
        ],
    ),
];

/// Classify a question by keyword lookup over its question and explanation text.
pub fn classify_topic(question: &str, explanation: &str) -> Topic {
    let text = format!("{} {}", question, explanation).to_lowercase();
    TOPIC_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}
