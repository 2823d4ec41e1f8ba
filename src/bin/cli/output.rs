//! Output formatting for CLI operations.

use console::style;
use serde_json::json;
use zipfnr::progress::format_bytes_iec;
use zipfnr::{Collision, Error, Operation, RewriteResult};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the changes a dry run would make
    fn format_plan(&self, plan: &[Operation]) -> String;

    /// Formats the result of a completed rewrite
    fn format_result(&self, result: &RewriteResult) -> String;

    /// Formats name collisions that blocked a rename
    fn format_collisions(&self, collisions: &[Collision]) -> String;

    /// Formats a failure
    fn format_error(&self, error: &Error) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_plan(&self, plan: &[Operation]) -> String {
        if plan.is_empty() {
            return "No members would change\n".to_string();
        }

        let mut output = String::new();
        for op in plan {
            match op {
                Operation::Rename { from, to, .. } => {
                    output.push_str(&format!("  rename  {} -> {}\n", from, style(to).green()));
                }
                Operation::Update {
                    name,
                    substitutions,
                    ..
                } => {
                    output.push_str(&format!(
                        "  update  {} ({} substitutions)\n",
                        name, substitutions
                    ));
                }
                Operation::Copy { .. } => {}
            }
        }

        let total: usize = plan.iter().map(Operation::substitutions).sum();
        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{} members would change, {} substitutions (dry run)\n",
            plan.len(),
            total
        ));
        output
    }

    fn format_result(&self, result: &RewriteResult) -> String {
        let edit = &result.edit;
        let mut output = String::new();

        if edit.is_noop() {
            output.push_str("No matches; archive rewritten unchanged\n");
        } else {
            output.push_str(&format!(
                "{} {} substitutions in {} members\n",
                style("Done:").green().bold(),
                edit.substitutions,
                edit.members_changed()
            ));
        }
        output.push_str(&format!("  Renamed:  {}\n", edit.members_renamed));
        output.push_str(&format!(
            "  Updated:  {} ({})\n",
            edit.members_updated,
            format_bytes_iec(edit.bytes_rewritten)
        ));
        output.push_str(&format!("  Copied:   {}\n", edit.members_copied));
        if edit.members_skipped > 0 {
            output.push_str(&format!(
                "  Skipped:  {} {}\n",
                edit.members_skipped,
                style("(not UTF-8)").yellow()
            ));
        }
        output.push_str(&format!("  Backup:   {}", result.backup_path.display()));
        if result.backup_replaced {
            output.push_str(" (replaced previous backup)");
        }
        output.push('\n');

        output
    }

    fn format_collisions(&self, collisions: &[Collision]) -> String {
        let mut output = String::from("Renaming would create duplicate member names:\n");
        for collision in collisions {
            output.push_str(&format!(
                "  {} <- {}\n",
                style(&collision.name).red(),
                collision.sources.join(", ")
            ));
        }
        output
    }

    fn format_error(&self, error: &Error) -> String {
        format!("Error: {}\nThe archive was not modified.\n", error)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &[Operation]) -> String {
        let items: Vec<_> = plan
            .iter()
            .map(|op| {
                json!({
                    "operation": op.operation_type(),
                    "source": op.source_name(),
                    "target": op.target_name(),
                    "substitutions": op.substitutions(),
                })
            })
            .collect();

        let obj = json!({
            "dry_run": true,
            "changes": items,
        });
        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_result(&self, result: &RewriteResult) -> String {
        let edit = &result.edit;
        let obj = json!({
            "success": true,
            "members_copied": edit.members_copied,
            "members_renamed": edit.members_renamed,
            "members_updated": edit.members_updated,
            "members_skipped": edit.members_skipped,
            "substitutions": edit.substitutions,
            "bytes_rewritten": edit.bytes_rewritten,
            "backup_path": result.backup_path.display().to_string(),
            "backup_crc32": format!("{:08x}", result.backup_crc32),
            "backup_replaced": result.backup_replaced,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_collisions(&self, collisions: &[Collision]) -> String {
        let items: Vec<_> = collisions
            .iter()
            .map(|c| json!({"name": c.name, "sources": c.sources}))
            .collect();
        let obj = json!({
            "success": false,
            "error": "name collision",
            "collisions": items,
        });
        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &Error) -> String {
        let obj = json!({
            "success": false,
            "error": error.to_string(),
            "member": error.member_name(),
        });
        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
