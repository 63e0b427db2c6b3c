//! Built-in reference data: the CFA Level I syllabus and the default schedule.

use chrono::NaiveDate;

use crate::model::{Catalog, PlanEntry, PlanEntryId, Topic};

/// Default exam day used by the countdown.
#[must_use]
pub fn default_exam_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 8, 24)
}

impl Catalog {
    /// The ten-topic CFA Level I syllabus.
    #[must_use]
    pub fn cfa_level_one() -> Self {
        Catalog::new(vec![
            Topic::new(
                "Quantitative Methods",
                [
                    "Rates and Returns",
                    "Time Value of Money in Finance",
                    "Statistical Measures of Asset Returns",
                    "Probability Trees and Conditional Expectations",
                    "Portfolio Mathematics",
                    "Simulation Methods",
                    "Estimation and Inference",
                    "Hypothesis Testing",
                    "Parametric and Non-Parametric Tests of Independence",
                    "Simple Linear Regression",
                    "Introduction to Big Data Techniques",
                ],
            )
            .with_prerequisites(["Prerequisites"]),
            Topic::new(
                "Economics",
                [
                    "The Firm and Market Structures",
                    "Understanding Business Cycles",
                    "Fiscal Policy",
                    "Monetary Policy",
                    "Introduction to Geopolitics",
                    "International Trade",
                    "Capital Flows and the FX Market",
                    "Exchange Rate Calculations",
                ],
            )
            .with_prerequisites(["Prerequisites"]),
            Topic::new(
                "Corporate Issuers",
                [
                    "Organizational Forms, Corporate Issuer Features, and Ownership",
                    "Investors and Other Stakeholders",
                    "Corporate Governance: Conflicts, Mechanisms, Risks, and Benefits",
                    "Working Capital and Liquidity",
                    "Capital Investments",
                    "Capital Structure",
                    "Business Models",
                ],
            ),
            Topic::new(
                "Financial Statement Analysis",
                [
                    "Introduction to Financial Statement Analysis",
                    "Analyzing Income Statements",
                    "Analyzing Balance Sheets",
                    "Analyzing Statements of Cash Flows I",
                    "Analyzing Statements of Cash Flows II",
                    "Analysis of Inventories",
                    "Analysis of Long-Term Assets",
                    "Topics in Long-Term Liabilities and Equity",
                    "Analysis of Income Taxes",
                    "Financial Reporting Quality",
                    "Financial Analysis Techniques",
                    "Introduction to Financial Statement Modeling",
                ],
            )
            .with_prerequisites(["Prerequisites"]),
            Topic::new(
                "Equity Investments",
                [
                    "Market Organization and Structure",
                    "Security Market Indexes",
                    "Market Efficiency",
                    "Overview of Equity Securities",
                    "Company Analysis: Past and Present",
                    "Industry and Competitive Analysis",
                    "Company Analysis: Forecasting",
                    "Equity Valuation: Concepts and Basic Tools",
                ],
            ),
            Topic::new(
                "Fixed Income",
                [
                    "Fixed-Income Instrument Features",
                    "Fixed-Income Cash Flows and Types",
                    "Fixed-Income Issuance and Trading",
                    "Fixed-Income Markets for Corporate Issuers",
                    "Fixed-Income Markets for Government Issuers",
                    "Introduction to Fixed-Income Valuation",
                    "Yields and Yield Spreads",
                    "The Term Structure of Interest Rates",
                    "Interest Rate Risk and Return",
                    "Credit Risk",
                    "Asset-Backed Securities",
                ],
            ),
            Topic::new(
                "Derivatives",
                [
                    "Derivative Instrument and Derivative Market Features",
                    "Forward Commitment and Contingent Claim Features and Instruments",
                    "Derivative Benefits, Risks, and Issuer and Investor Uses",
                    "Arbitrage, Replication, and the Cost of Carry in Pricing Derivatives",
                    "Pricing and Valuation of Forward Contracts and for an Underlying with Varying Maturities",
                    "Pricing and Valuation of Futures Contracts",
                    "Pricing and Valuation of Interest Rates and Other Swaps",
                    "Pricing and Valuation of Options",
                    "Option Replication Using Put\u{2013}Call Parity",
                    "Valuing a Derivative Using a One-Period Binomial Model",
                ],
            ),
            Topic::new(
                "Alternative Investments",
                [
                    "Alternative Investment Features, Methods, and Structures",
                    "Alternative Investment Performance and Returns",
                    "Investments in Private Capital: Equity and Debt",
                    "Real Estate and Infrastructure",
                    "Natural Resources",
                    "Hedge Funds",
                    "Introduction to Digital Assets",
                ],
            ),
            Topic::new(
                "Portfolio Management",
                [
                    "Portfolio Risk and Return: Part I",
                    "Portfolio Risk and Return: Part II",
                    "Portfolio Management: An Overview",
                    "Basics of Portfolio Planning and Construction",
                    "The Behavioral Biases of Individuals",
                    "Introduction to Risk Management",
                    "Technical Analysis",
                    "Fintech in Investment Management",
                ],
            ),
            Topic::new(
                "Ethics & Professional Standards",
                [
                    "Ethics and Trust in the Investment Profession",
                    "Code of Ethics and Standards of Professional Conduct",
                    "Guidance for Standards I\u{2013}VII",
                    "Introduction to the Global Investment Performance Standards (GIPS)",
                    "Ethics Application",
                ],
            ),
        ])
    }
}

// (name, start, days, topic)
const DEFAULT_PLAN: [(&str, (i32, u32, u32), u32, Option<usize>); 11] = [
    ("Quantitative Methods", (2026, 2, 8), 16, Some(0)),
    ("Economics", (2026, 2, 24), 15, Some(1)),
    ("Corporate Issuers", (2026, 3, 11), 12, Some(2)),
    ("Financial Statement Analysis", (2026, 3, 23), 25, Some(3)),
    ("Equity Investments", (2026, 4, 17), 19, Some(4)),
    ("Fixed Income", (2026, 5, 6), 27, Some(5)),
    ("Derivatives", (2026, 6, 2), 11, Some(6)),
    ("Alternative Investments", (2026, 6, 13), 11, Some(7)),
    ("Portfolio Management", (2026, 6, 24), 14, Some(8)),
    ("Ethics", (2026, 7, 8), 15, Some(9)),
    ("Review", (2026, 7, 23), 30, None),
];

/// The default schedule used to seed an empty planner. Ids start at 1.
#[must_use]
pub fn default_plan() -> Vec<PlanEntry> {
    DEFAULT_PLAN
        .iter()
        .zip(1_u64..)
        .filter_map(|((name, (y, m, d), days, topic), id)| {
            let start = NaiveDate::from_ymd_opt(*y, *m, *d)?;
            PlanEntry::new(PlanEntryId::new(id), *name, *topic, start, *days).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn syllabus_has_ten_topics() {
        let catalog = Catalog::cfa_level_one();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.total_readings(), 87);
        assert_eq!(catalog.topic(0).unwrap().prerequisite_count(), 1);
        assert_eq!(catalog.topic(2).unwrap().prerequisite_count(), 0);
    }

    #[test]
    fn default_plan_is_contiguous_and_ends_with_review() {
        let plan = default_plan();
        assert_eq!(plan.len(), 11);
        for pair in plan.windows(2) {
            assert_eq!(pair[1].start(), pair[0].end() + Duration::days(1));
        }
        let last = plan.last().unwrap();
        assert!(last.is_review());
        assert_eq!(last.end(), NaiveDate::from_ymd_opt(2026, 8, 21).unwrap());
    }

    #[test]
    fn default_plan_topics_exist_in_catalog() {
        let catalog = Catalog::cfa_level_one();
        for entry in default_plan() {
            if let Some(topic) = entry.topic_index() {
                assert!(catalog.topic(topic).is_some());
            }
        }
    }
}
