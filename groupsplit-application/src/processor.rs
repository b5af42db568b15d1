use crate::{
    error::ProcessingError,
    model::{LedgerCommand, LedgerCommandWithLine, ProcessingOutput},
    ports::LedgerCommandParser,
};
use groupsplit_domain::{
    BalanceCalculator, ExpenseLedger, LedgerError, SettlementPlanner, Tolerance,
};

/// Applies parsed ledger commands and answers the query commands among them.
pub struct LedgerProcessor<'a> {
    parser: &'a dyn LedgerCommandParser,
    calculator: BalanceCalculator,
    planner: SettlementPlanner,
}

impl<'a> LedgerProcessor<'a> {
    pub fn new(parser: &'a dyn LedgerCommandParser, tolerance: Tolerance) -> Self {
        Self {
            parser,
            calculator: BalanceCalculator::new(tolerance),
            planner: SettlementPlanner::new(tolerance),
        }
    }

    pub fn calculator(&self) -> &BalanceCalculator {
        &self.calculator
    }

    pub fn planner(&self) -> &SettlementPlanner {
        &self.planner
    }

    /// Parses `content` and applies it to `ledger`.
    ///
    /// The script is applied to a copy which replaces `ledger` only when every
    /// command succeeded.
    pub fn process(
        &self,
        ledger: &mut ExpenseLedger,
        content: &str,
    ) -> Result<Vec<ProcessingOutput>, ProcessingError> {
        let commands = self.parser.parse(content)?;
        let mut working = ledger.clone();
        let outputs = self.apply(&mut working, &commands)?;
        *ledger = working;
        Ok(outputs)
    }

    pub fn apply(
        &self,
        ledger: &mut ExpenseLedger,
        commands: &[LedgerCommandWithLine<'_>],
    ) -> Result<Vec<ProcessingOutput>, ProcessingError> {
        let mut outputs = Vec::new();

        for LedgerCommandWithLine { line, command } in commands {
            let line = *line;
            let ledger_error = |source: LedgerError| ProcessingError::Ledger { line, source };

            match command {
                LedgerCommand::Rename(name) => ledger.rename(*name),
                LedgerCommand::AddMember(member) => {
                    ledger.add_member(member).map_err(ledger_error)?;
                }
                LedgerCommand::RemoveMember(member) => {
                    let removed = ledger.remove_member(member).map_err(ledger_error)?;
                    if !removed.is_empty() {
                        tracing::info!(
                            line,
                            member = *member,
                            cascaded_expenses = removed.len(),
                            "Member removal dropped their expenses"
                        );
                    }
                }
                LedgerCommand::AddExpense {
                    payer,
                    amount,
                    description,
                } => {
                    ledger
                        .add_expense(payer, *amount, *description)
                        .map_err(ledger_error)?;
                }
                LedgerCommand::RemoveExpense(id) => {
                    ledger.remove_expense(*id).map_err(ledger_error)?;
                }
                LedgerCommand::ShowBalances => outputs.push(ProcessingOutput::Balances {
                    line,
                    balances: self.calculator.calculate(ledger),
                }),
                LedgerCommand::ShowSummary => outputs.push(ProcessingOutput::Summary {
                    line,
                    summary: ledger.summary(),
                }),
                LedgerCommand::Settle => {
                    let plan = self
                        .planner
                        .plan(self.calculator.calculate(ledger))
                        .map_err(|source| ProcessingError::Settlement { line, source })?;
                    outputs.push(ProcessingOutput::Plan { line, plan });
                }
            }
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandParseError;
    use groupsplit_domain::{ExpenseId, MemberId, Money};
    use rstest::{fixture, rstest};

    /// Parser stub that replays pre-built commands.
    struct StaticParser(Vec<LedgerCommandWithLine<'static>>);

    impl LedgerCommandParser for StaticParser {
        fn parse<'a>(
            &self,
            _content: &'a str,
        ) -> Result<Vec<LedgerCommandWithLine<'a>>, CommandParseError> {
            Ok(self.0.clone())
        }
    }

    struct FailingParser;

    impl LedgerCommandParser for FailingParser {
        fn parse<'a>(
            &self,
            _content: &'a str,
        ) -> Result<Vec<LedgerCommandWithLine<'a>>, CommandParseError> {
            Err(CommandParseError::SyntaxError {
                line: 3,
                detail: "boom".to_string(),
            })
        }
    }

    fn numbered(commands: Vec<LedgerCommand<'static>>) -> Vec<LedgerCommandWithLine<'static>> {
        commands
            .into_iter()
            .enumerate()
            .map(|(idx, command)| LedgerCommandWithLine {
                line: idx + 1,
                command,
            })
            .collect()
    }

    #[fixture]
    fn trip() -> Vec<LedgerCommand<'static>> {
        vec![
            LedgerCommand::Rename("Trip"),
            LedgerCommand::AddMember("A"),
            LedgerCommand::AddMember("B"),
            LedgerCommand::AddMember("C"),
            LedgerCommand::AddExpense {
                payer: "A",
                amount: Money::from_i64(60),
                description: "x",
            },
            LedgerCommand::AddExpense {
                payer: "B",
                amount: Money::from_i64(60),
                description: "y",
            },
        ]
    }

    #[rstest]
    fn settle_outputs_plan(mut trip: Vec<LedgerCommand<'static>>) {
        trip.push(LedgerCommand::Settle);
        let parser = StaticParser(numbered(trip));
        let processor = LedgerProcessor::new(&parser, Tolerance::DEFAULT);
        let mut ledger = ExpenseLedger::new();

        let outputs = processor.process(&mut ledger, "").unwrap();

        let [ProcessingOutput::Plan { line, plan }] = outputs.as_slice() else {
            panic!("expected a single plan, got {outputs:?}");
        };
        assert_eq!(*line, 7);
        assert_eq!(plan.transfers.len(), 2);
        assert!(plan.transfers.iter().all(|t| t.from == MemberId::new("C")));
        assert_eq!(ledger.name(), Some("Trip"));
        assert_eq!(ledger.expenses().len(), 2);
    }

    #[rstest]
    fn queries_reflect_state_at_their_line(mut trip: Vec<LedgerCommand<'static>>) {
        trip.push(LedgerCommand::ShowBalances);
        trip.push(LedgerCommand::RemoveExpense(ExpenseId(1)));
        trip.push(LedgerCommand::ShowSummary);
        let parser = StaticParser(numbered(trip));
        let processor = LedgerProcessor::new(&parser, Tolerance::DEFAULT);
        let mut ledger = ExpenseLedger::new();

        let outputs = processor.process(&mut ledger, "").unwrap();

        match &outputs[..] {
            [
                ProcessingOutput::Balances { balances, .. },
                ProcessingOutput::Summary { summary, .. },
            ] => {
                assert_eq!(balances["C"], Money::from_i64(-40));
                assert_eq!(summary.total_amount, Money::from_i64(60));
                assert_eq!(summary.per_person_share, Some(Money::from_i64(20)));
            }
            other => panic!("unexpected outputs: {other:?}"),
        }
    }

    #[rstest]
    fn failing_command_leaves_ledger_untouched(mut trip: Vec<LedgerCommand<'static>>) {
        trip.push(LedgerCommand::AddExpense {
            payer: "Z",
            amount: Money::from_i64(5),
            description: "ghost",
        });
        let parser = StaticParser(numbered(trip));
        let processor = LedgerProcessor::new(&parser, Tolerance::DEFAULT);
        let mut ledger = ExpenseLedger::named("Before");

        let err = processor.process(&mut ledger, "").unwrap_err();

        assert_eq!(
            err,
            ProcessingError::Ledger {
                line: 7,
                source: LedgerError::UnknownMember(MemberId::new("Z")),
            }
        );
        assert_eq!(err.line(), 7);
        assert_eq!(ledger, ExpenseLedger::named("Before"));
    }

    #[test]
    fn parse_errors_are_forwarded() {
        let processor = LedgerProcessor::new(&FailingParser, Tolerance::DEFAULT);
        let mut ledger = ExpenseLedger::new();

        let err = processor.process(&mut ledger, "whatever").unwrap_err();

        assert_eq!(err.line(), 3);
        assert!(matches!(err, ProcessingError::Parse(_)));
    }
}
