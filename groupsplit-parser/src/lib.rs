#![warn(clippy::uninlined_format_args)]

//! Line-oriented ledger script.
//!
//! ```text
//! GROUP := Ski trip
//! MEMBERS := alice bob carol
//! alice paid 90 for lift passes
//! bob paid 12.5 SOL
//! !remove-expense 1
//! !remove carol
//! !balances
//! !settle
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, u64},
    combinator::{opt, recognize, rest},
    multi::{many1, separated_list1},
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense<'a> {
    pub payer: &'a str,
    /// May be negative; the ledger decides whether it is acceptable.
    pub amount: Decimal,
    pub description: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    RemoveMember(&'a str),
    RemoveExpense(u64),
    Balances,
    Settle,
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    GroupName(&'a str),
    Members(Vec<&'a str>),
    Expense(Expense<'a>),
    Command(Command<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'))(input)
}

fn separator(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((multispace1, tag(","), tag("，"))))).parse(input)
}

fn member_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(separator, identifier).parse(input)
}

fn assign(input: &str) -> IResult<&str, &str> {
    (multispace0, tag(":="), multispace0)
        .map(|(_, op, _)| op)
        .parse(input)
}

// GROUP := free text name
fn group_name(input: &str) -> IResult<&str, &str> {
    (tag_no_case("GROUP"), assign, rest)
        .map(|(_, _, name): (_, _, &str)| name.trim())
        .parse(input)
}

// MEMBERS := alice bob, carol
fn members(input: &str) -> IResult<&str, Vec<&str>> {
    (tag_no_case("MEMBERS"), assign, member_list)
        .map(|(_, _, members)| members)
        .parse(input)
}

fn amount(input: &str) -> IResult<&str, Decimal> {
    (
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))),
        opt((multispace0, tag_no_case("SOL"))),
    )
        .map_res(|(digits, _): (&str, _)| digits.parse::<Decimal>())
        .parse(input)
}

fn description(input: &str) -> IResult<&str, &str> {
    (multispace1, tag_no_case("for"), multispace1, rest)
        .map(|(_, _, _, text): (_, _, _, &str)| text.trim())
        .parse(input)
}

// {payer} paid {amount} [for {description}]
fn expense(input: &str) -> IResult<&str, Expense<'_>> {
    (
        identifier,
        multispace1,
        tag_no_case("paid"),
        multispace1,
        amount,
        opt(description),
    )
        .map(|(payer, _, _, _, amount, description)| Expense {
            payer,
            amount,
            description: description.unwrap_or(""),
        })
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command<'_>> {
    alt((
        (tag_no_case("!remove-expense"), multispace1, u64)
            .map(|(_, _, id)| Command::RemoveExpense(id)),
        (tag_no_case("!remove"), multispace1, identifier)
            .map(|(_, _, member)| Command::RemoveMember(member)),
        tag_no_case("!balances").map(|_| Command::Balances),
        tag_no_case("!settle").map(|_| Command::Settle),
        tag_no_case("!summary").map(|_| Command::Summary),
    ))
    .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        group_name.map(Statement::GroupName),
        members.map(Statement::Members),
        command.map(Statement::Command),
        expense.map(Statement::Expense),
    ))
    .parse(input)
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with("//")
}

/// Parses a whole script. Blank lines and lines starting with `//` are skipped.
pub fn parse_program(input: &str) -> Result<Program<'_>, ParseError> {
    let mut statements = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if is_skipped(line) {
            continue;
        }
        match statement(line) {
            Ok((rest, statement)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: format!("Unparsed input: {}", rest.trim()),
                    });
                }
                statements.push(StatementWithLine {
                    line: idx + 1,
                    statement,
                });
            }
            Err(err) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: err.to_string(),
                });
            }
        }
    }

    Ok(Program { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[rstest]
    #[case::spaces("MEMBERS := alice bob carol", &["alice", "bob", "carol"])]
    #[case::commas("MEMBERS := alice, bob,carol", &["alice", "bob", "carol"])]
    #[case::fullwidth_comma("members:=alice，bob", &["alice", "bob"])]
    #[case::wallet(
        "MEMBERS := 7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
        &["7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"]
    )]
    fn parses_member_lists(#[case] input: &str, #[case] expected: &[&str]) {
        let (rest, stmt) = statement(input).unwrap();
        assert!(rest.trim().is_empty());
        assert_eq!(stmt, Statement::Members(expected.to_vec()));
    }

    #[rstest]
    #[case::with_description("alice paid 90 for lift passes", "alice", "90", "lift passes")]
    #[case::without_description("bob paid 12.5", "bob", "12.5", "")]
    #[case::currency_suffix("bob paid 0.25 SOL for coffee", "bob", "0.25", "coffee")]
    #[case::negative("carol paid -3 for refund", "carol", "-3", "refund")]
    #[case::upper_case("carol PAID 7 FOR taxi", "carol", "7", "taxi")]
    fn parses_expenses(
        #[case] input: &str,
        #[case] payer: &str,
        #[case] amount: &str,
        #[case] description: &str,
    ) {
        let (_, stmt) = statement(input).unwrap();
        assert_eq!(
            stmt,
            Statement::Expense(Expense {
                payer,
                amount: dec(amount),
                description,
            })
        );
    }

    #[rstest]
    #[case::remove_member("!remove carol", Command::RemoveMember("carol"))]
    #[case::remove_expense("!remove-expense 3", Command::RemoveExpense(3))]
    #[case::balances("!balances", Command::Balances)]
    #[case::settle("!SETTLE", Command::Settle)]
    #[case::summary("!summary", Command::Summary)]
    fn parses_commands(#[case] input: &str, #[case] expected: Command<'_>) {
        let (_, stmt) = statement(input).unwrap();
        assert_eq!(stmt, Statement::Command(expected));
    }

    #[test]
    fn parses_group_name() {
        let (_, stmt) = statement("GROUP :=  Ski trip 2026 ").unwrap();
        assert_eq!(stmt, Statement::GroupName("Ski trip 2026"));
    }

    #[test]
    fn program_tracks_line_numbers_and_skips_comments() {
        let program = parse_program(
            "// weekend\nMEMBERS := a b\n\n  a paid 10 for pizza\n!settle\n",
        )
        .unwrap();

        let lines: Vec<usize> = program.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, [2, 4, 5]);
    }

    #[rstest]
    #[case::garbage("MEMBERS := a b\nthis is not valid", 2)]
    #[case::trailing("!settle now", 1)]
    #[case::missing_amount("MEMBERS := a\na paid for pizza", 2)]
    fn reports_syntax_errors_with_line(#[case] input: &str, #[case] line: usize) {
        match parse_program(input) {
            Err(ParseError::SyntaxError { line: actual, .. }) => assert_eq!(actual, line),
            Ok(program) => panic!("expected syntax error, got {program:?}"),
        }
    }
}
