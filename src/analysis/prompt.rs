//! @ai:module:intent Build the analysis prompt for a benchmark result
//! @ai:module:layer application
//! @ai:module:public_api PromptBuilder, ANALYSIS_INSTRUCTIONS
//! @ai:module:stateless true

use crate::metrics::{BenchmarkResult, MetricSet, Summary};

/// Analysis items the report is asked to cover, in order.
pub const ANALYSIS_INSTRUCTIONS: [(&str, &str); 6] = [
    ("Performance Overview", "overall assessment of the server's performance"),
    (
        "Concurrency Impact",
        "how performance changes as concurrency increases",
    ),
    (
        "Bottleneck Identification",
        "the concurrency level where performance starts to degrade, and its likely cause",
    ),
    (
        "TTFT vs Throughput Trade-off",
        "the relationship between response latency and throughput",
    ),
    (
        "Recommended Operating Concurrency",
        "the concurrency level recommended for production traffic",
    ),
    (
        "Improvement Suggestions",
        "concrete suggestions for improving performance",
    ),
];

/// @ai:intent Renders a deterministic text prompt from a result
pub struct PromptBuilder;

impl PromptBuilder {
    /// @ai:intent Create a new prompt builder
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Build the full analysis prompt
    /// @ai:post identical input yields identical text
    /// @ai:effects pure
    pub fn build(&self, result: &BenchmarkResult) -> String {
        let mut prompt = String::new();

        prompt.push_str("Please analyze the following LLM server benchmark results.\n\n");
        prompt.push_str(&Self::environment_section(result));
        prompt.push_str(&Self::summary_section(result.summary.as_ref()));
        prompt.push_str(&Self::results_table(&result.results));
        prompt.push_str(&Self::instructions_section());

        prompt
    }

    /// @ai:intent Describe the tested server and run duration
    /// @ai:effects pure
    fn environment_section(result: &BenchmarkResult) -> String {
        let meta = &result.metadata;
        let duration = meta
            .duration_seconds
            .map(|d| format!("{:.1}s", d))
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            "## Test Environment\n\
             - **Model**: {}\n\
             - **Server**: {}\n\
             - **Test Duration**: {}\n\n",
            meta.model, meta.server_url, duration
        )
    }

    /// @ai:intent Headline numbers of the run
    /// @ai:effects pure
    fn summary_section(summary: Option<&Summary>) -> String {
        let mut output = String::from("## Result Summary\n");

        match summary {
            Some(s) => {
                output.push_str(&format!("- **Best Throughput**: {:.1} tok/s\n", s.best_throughput));
                output.push_str(&format!("- **Best TTFT (p50)**: {:.1} ms\n", s.best_ttft_p50));
                output.push_str(&format!("- **Best Concurrency**: {}\n", s.best_concurrency));
                output.push_str(&format!("- **Overall Error Rate**: {:.2}%\n", s.overall_error_rate));
                output.push_str(&format!(
                    "- **Average Goodput**: {}\n",
                    percent_or_na(s.avg_goodput_percent)
                ));
            }
            None => {
                for label in [
                    "Best Throughput",
                    "Best TTFT (p50)",
                    "Best Concurrency",
                    "Overall Error Rate",
                    "Average Goodput",
                ] {
                    output.push_str(&format!("- **{}**: N/A\n", label));
                }
            }
        }

        output.push('\n');
        output
    }

    /// @ai:intent Markdown table with one row per concurrency level
    /// @ai:effects pure
    fn results_table(results: &[MetricSet]) -> String {
        let mut output = String::from("## Results by Concurrency\n");

        output.push_str(
            "| Concurrency | Throughput (tok/s) | TTFT p50 (ms) | TTFT p99 (ms) | Error Rate (%) | Goodput (%) |\n",
        );
        output.push_str(
            "|-------------|-------------------|---------------|---------------|----------------|-------------|\n",
        );

        for m in results {
            let goodput = m
                .goodput
                .map(|g| format!("{:.1}", g.goodput_percent))
                .unwrap_or_else(|| "N/A".to_string());

            output.push_str(&format!(
                "| {} | {:.1} | {:.1} | {:.1} | {:.2} | {} |\n",
                m.concurrency, m.throughput, m.ttft.p50, m.ttft.p99, m.error_rate_percent, goodput
            ));
        }

        output.push('\n');
        output
    }

    /// @ai:intent Fixed list of analysis requests
    /// @ai:effects pure
    fn instructions_section() -> String {
        let mut output = String::from(
            "## Analysis Request\nBased on the benchmark results above, analyze the following:\n\n",
        );

        for (i, (title, detail)) in ANALYSIS_INSTRUCTIONS.iter().enumerate() {
            output.push_str(&format!("{}. **{}**: {}\n", i + 1, title, detail));
        }

        output.push_str("\nWrite each section in **markdown format**.");
        output
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v))
        .unwrap_or_else(|| "N/A".to_string())
}
