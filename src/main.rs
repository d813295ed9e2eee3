#![allow(unused_imports, dead_code)]
use clap::Parser;
use loancalc::loan::{solve, LoanKind, LoanRequest, LoanResult};
use log::debug;
use simple_logger::SimpleLogger;

/// Loan repayment calculator for annuity and differentiated schedules.
#[derive(Parser, Debug)]
#[command(name = "loancalc")]
struct Args {
    /// Schedule type: "annuity" or "diff"
    #[arg(long = "type", value_name = "TYPE")]
    loan_type: Option<String>,

    /// Loan principal
    #[arg(long, allow_negative_numbers = true)]
    principal: Option<f64>,

    /// Monthly payment
    #[arg(long, allow_negative_numbers = true)]
    payment: Option<f64>,

    /// Number of months
    #[arg(long, allow_negative_numbers = true)]
    periods: Option<i64>,

    /// Annual interest rate, percent
    #[arg(long, allow_negative_numbers = true)]
    interest: Option<f64>,
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .unwrap();

    let args = Args::parse();
    let request = LoanRequest {
        kind: args.loan_type.as_deref().and_then(LoanKind::from_flag),
        principal: args.principal,
        payment: args.payment,
        periods: args.periods,
        annual_rate: args.interest,
    };
    debug!("request: {:?}", request);

    // a validation failure prints "Incorrect parameters" and nothing else;
    // the process still exits 0
    match solve(&request) {
        Ok(result) => println!("{}", result),
        Err(err) => println!("{}", err),
    }
}

// verifies that types can implement the gated traits below
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanResult>();
}
