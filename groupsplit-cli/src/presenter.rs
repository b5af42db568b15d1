use crate::text_table::{Alignment, TextTableBuilder};
use groupsplit_application::{ExecutionReport, ProcessingOutput};
use groupsplit_domain::{GroupSummary, MemberBalances, Money, TransferInstruction};

const ALL_SETTLED: &str = "All settled.";

/// Renders ledger snapshots as plain text.
pub struct SettlementPresenter {
    display_scale: u32,
}

impl SettlementPresenter {
    pub fn new(display_scale: u32) -> Self {
        Self { display_scale }
    }

    pub fn render_output(&self, output: &ProcessingOutput) -> String {
        match output {
            ProcessingOutput::Balances { line, balances } => {
                format!("== balances (line {line}) ==\n{}", self.render_balances(balances))
            }
            ProcessingOutput::Summary { line, summary } => {
                format!("== summary (line {line}) ==\n{}", self.render_summary(summary))
            }
            ProcessingOutput::Plan { line, plan } => format!(
                "== settlement (line {line}) ==\n{}",
                self.render_transfers(&plan.transfers)
            ),
        }
    }

    pub fn render_summary(&self, summary: &GroupSummary) -> String {
        let per_person = summary
            .per_person_share
            .map_or_else(|| "-".to_string(), |share| self.amount(share));
        format!(
            "Group: {}\nMembers: {}\nExpenses: {}\nTotal: {}\nPer person: {per_person}\n",
            summary.name.as_deref().unwrap_or("(unnamed)"),
            summary.member_count,
            summary.expense_count,
            self.amount(summary.total_amount),
        )
    }

    pub fn render_balances(&self, balances: &MemberBalances) -> String {
        if balances.is_empty() {
            return "No members.\n".to_string();
        }
        balances
            .iter()
            .fold(
                TextTableBuilder::new()
                    .headers(&["Member", "Balance"])
                    .alignments(&[Alignment::Left, Alignment::Right]),
                |table, (member, balance)| {
                    table.row(vec![member.to_string(), self.signed_amount(*balance)])
                },
            )
            .build()
    }

    pub fn render_transfers(&self, transfers: &[TransferInstruction]) -> String {
        if transfers.is_empty() {
            return format!("{ALL_SETTLED}\n");
        }
        transfers
            .iter()
            .fold(
                TextTableBuilder::new()
                    .headers(&["From", "To", "Amount"])
                    .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right]),
                |table, transfer| {
                    table.row(vec![
                        transfer.from.to_string(),
                        transfer.to.to_string(),
                        self.amount(transfer.amount),
                    ])
                },
            )
            .build()
    }

    pub fn render_execution(&self, report: &ExecutionReport) -> String {
        if report.outcomes.is_empty() {
            return format!("{ALL_SETTLED}\n");
        }
        report
            .outcomes
            .iter()
            .fold(
                TextTableBuilder::new()
                    .headers(&["From", "To", "Amount", "Result"])
                    .alignments(&[
                        Alignment::Left,
                        Alignment::Left,
                        Alignment::Right,
                        Alignment::Left,
                    ]),
                |table, outcome| {
                    let result = match &outcome.result {
                        Ok(receipt) => receipt.reference.clone(),
                        Err(err) => format!("failed: {err}"),
                    };
                    table.row(vec![
                        outcome.transfer.from.to_string(),
                        outcome.transfer.to.to_string(),
                        self.amount(outcome.transfer.amount),
                        result,
                    ])
                },
            )
            .build()
    }

    fn amount(&self, amount: Money) -> String {
        let prec = self.display_scale as usize;
        format!("{:.prec$}", self.rounded(amount).as_decimal())
    }

    fn signed_amount(&self, amount: Money) -> String {
        let rounded = self.rounded(amount);
        if rounded.is_zero() || rounded.is_negative() {
            self.amount(rounded)
        } else {
            format!("+{}", self.amount(rounded))
        }
    }

    fn rounded(&self, amount: Money) -> Money {
        let rounded = amount.round_dp(self.display_scale);
        if rounded.is_zero() { Money::ZERO } else { rounded }
    }
}
