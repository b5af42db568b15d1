use groupsplit_application::{
    CommandParseError, LedgerCommand, LedgerCommandParser, LedgerCommandWithLine,
};
use groupsplit_domain::{ExpenseId, Money};
use groupsplit_parser::{Command, ParseError, Statement, parse_program};

pub struct ScriptCommandParser;

impl LedgerCommandParser for ScriptCommandParser {
    fn parse<'a>(
        &self,
        content: &'a str,
    ) -> Result<Vec<LedgerCommandWithLine<'a>>, CommandParseError> {
        let program = parse_program(content).map_err(|err| match err {
            ParseError::SyntaxError { line, detail } => {
                CommandParseError::SyntaxError { line, detail }
            }
        })?;

        let mut commands = Vec::with_capacity(program.statements.len());
        for statement in program.statements {
            let line = statement.line;
            let mut push = |command| commands.push(LedgerCommandWithLine { line, command });
            match statement.statement {
                Statement::GroupName(name) => push(LedgerCommand::Rename(name)),
                Statement::Members(members) => {
                    for member in members {
                        push(LedgerCommand::AddMember(member));
                    }
                }
                Statement::Expense(expense) => push(LedgerCommand::AddExpense {
                    payer: expense.payer,
                    amount: Money::from_decimal(expense.amount),
                    description: expense.description,
                }),
                Statement::Command(Command::RemoveMember(member)) => {
                    push(LedgerCommand::RemoveMember(member))
                }
                Statement::Command(Command::RemoveExpense(id)) => {
                    push(LedgerCommand::RemoveExpense(ExpenseId(id)))
                }
                Statement::Command(Command::Balances) => push(LedgerCommand::ShowBalances),
                Statement::Command(Command::Summary) => push(LedgerCommand::ShowSummary),
                Statement::Command(Command::Settle) => push(LedgerCommand::Settle),
            }
        }

        Ok(commands)
    }
}
