use log::{debug, trace};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanKind {
    Annuity,
    Differentiated,
}

impl LoanKind {
    // spelling accepted by the --type flag
    pub fn from_flag(flag: &str) -> Option<LoanKind> {
        match flag {
            "annuity" => Some(LoanKind::Annuity),
            "diff" => Some(LoanKind::Differentiated),
            _ => None,
        }
    }
}

// Built once at entry from the parsed flags and passed by value into the
// solver. Presence is carried by Option, so supplying a flag's literal
// default (e.g. --principal=0) still counts as supplied.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanRequest {
    pub kind: Option<LoanKind>,
    pub principal: Option<f64>,
    pub payment: Option<f64>,
    pub periods: Option<i64>,
    pub annual_rate: Option<f64>,
}

// Every rejected input combination collapses to this one error; callers
// learn nothing about which rule failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("Incorrect parameters")]
pub struct InvalidParameters;

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanResult {
    AnnuityPayment { payment: i64, overpayment: i64 },
    LoanPrincipal { principal: i64, overpayment: i64 },
    RepaymentTerm { months: i64, overpayment: i64 },
    Differentiated { payments: Vec<i64>, overpayment: i64 },
}

impl fmt::Display for LoanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanResult::AnnuityPayment {
                payment,
                overpayment,
            } => {
                write!(
                    f,
                    "Your annuity payment = {}!\n\nOverpayment = {}",
                    payment, overpayment
                )
            }
            LoanResult::LoanPrincipal {
                principal,
                overpayment,
            } => {
                write!(
                    f,
                    "Your loan principal = {}!\n\nOverpayment = {}",
                    principal, overpayment
                )
            }
            LoanResult::RepaymentTerm {
                months,
                overpayment,
            } => {
                write!(
                    f,
                    "{}\n\nOverpayment = {}",
                    humanize_months(*months),
                    overpayment
                )
            }
            LoanResult::Differentiated {
                payments,
                overpayment,
            } => {
                for (month, payment) in payments.iter().enumerate() {
                    writeln!(f, "Month {}: payment is {}", month + 1, payment)?;
                }
                write!(f, "\nOverpayment = {}", overpayment)
            }
        }
    }
}

// rejects invalid, incomplete, or contradictory parameter combinations
// before any arithmetic runs
pub fn validate(request: &LoanRequest) -> Result<(), InvalidParameters> {
    if request.kind.is_none() {
        return Err(InvalidParameters);
    }

    match request.annual_rate {
        Some(rate) if rate > 0. => {}
        _ => return Err(InvalidParameters),
    }

    if request.principal.is_some_and(|p| p < 0.)
        || request.payment.is_some_and(|p| p < 0.)
        || request.periods.is_some_and(|n| n < 0)
    {
        return Err(InvalidParameters);
    }

    // a differentiated schedule always computes the per-month payments;
    // a fixed payment value is a contradiction
    if request.kind == Some(LoanKind::Differentiated) && request.payment.is_some() {
        return Err(InvalidParameters);
    }

    let supplied = [
        request.principal.is_some(),
        request.payment.is_some(),
        request.periods.is_some(),
    ]
    .iter()
    .filter(|&&present| present)
    .count();
    if supplied < 2 {
        return Err(InvalidParameters);
    }

    Ok(())
}

// validate, then select the solver mode by which single input is absent;
// annuity with all three of principal, payment and periods supplied selects
// no mode and is rejected
pub fn solve(request: &LoanRequest) -> Result<LoanResult, InvalidParameters> {
    validate(request)?;
    debug!("solving {:?}", request);

    let inputs = (
        request.principal,
        request.payment,
        request.periods,
        request.annual_rate,
    );
    match (request.kind, inputs) {
        (Some(LoanKind::Differentiated), (Some(principal), None, Some(periods), Some(rate))) => {
            Ok(differentiated_schedule(principal, periods, rate))
        }
        (Some(LoanKind::Annuity), (Some(principal), None, Some(periods), Some(rate))) => {
            Ok(annuity_payment(principal, periods, rate))
        }
        (Some(LoanKind::Annuity), (None, Some(payment), Some(periods), Some(rate))) => {
            Ok(loan_principal(payment, periods, rate))
        }
        (Some(LoanKind::Annuity), (Some(principal), Some(payment), None, Some(rate))) => {
            Ok(repayment_term(principal, payment, rate))
        }
        _ => Err(InvalidParameters),
    }
}

fn monthly_rate(&annual_rate: &f64) -> f64 {
    annual_rate / 1200.
}

// i·(1+i)^n / ((1+i)^n − 1), the factor relating principal to payment
fn annuity_coefficient(&i: &f64, &n: &f64) -> f64 {
    let factor = (1. + i).powf(n);
    i * factor / (factor - 1.)
}

fn annuity_payment(principal: f64, periods: i64, annual_rate: f64) -> LoanResult {
    let i = monthly_rate(&annual_rate);
    let payment = (principal * annuity_coefficient(&i, &(periods as f64))).ceil() as i64;
    trace!(
        "payment {} for principal {} over {} months",
        payment,
        principal,
        periods
    );

    LoanResult::AnnuityPayment {
        payment,
        overpayment: payment * periods - principal as i64,
    }
}

fn loan_principal(payment: f64, periods: i64, annual_rate: f64) -> LoanResult {
    let i = monthly_rate(&annual_rate);
    let principal = (payment / annuity_coefficient(&i, &(periods as f64))).floor() as i64;

    LoanResult::LoanPrincipal {
        principal,
        overpayment: (payment * periods as f64) as i64 - principal,
    }
}

fn repayment_term(principal: f64, payment: f64, annual_rate: f64) -> LoanResult {
    let i = monthly_rate(&annual_rate);
    // NaN when payment <= i * principal; the validator does not catch that,
    // and the integer cast below saturates it to 0
    let n = (payment / (payment - i * principal)).ln() / (1. + i).ln();
    let months = n.round() as i64;

    LoanResult::RepaymentTerm {
        months,
        overpayment: (payment * months as f64 - principal) as i64,
    }
}

fn differentiated_schedule(principal: f64, periods: i64, annual_rate: f64) -> LoanResult {
    let i = monthly_rate(&annual_rate);
    let mut payments = Vec::with_capacity(periods as usize);
    let mut total = 0;

    for month in 1..=periods {
        let payment = differentiated_payment(&principal, &periods, &month, &i);
        trace!("month {}, payment {}", month, payment);
        total += payment;
        payments.push(payment);
    }

    LoanResult::Differentiated {
        payments,
        overpayment: total - principal as i64,
    }
}

fn differentiated_payment(&principal: &f64, &periods: &i64, &month: &i64, &rate: &f64) -> i64 {
    let base = principal / periods as f64;
    let interest = rate * (principal - (month - 1) as f64 * base);
    (base + interest).ceil() as i64
}

fn pluralize(word: &str, n: i64) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn humanize_months(months: i64) -> String {
    let years = months / 12;
    let remaining = months % 12;

    if years > 0 {
        format!(
            "It will take {} {} and {} {} to repay this loan!",
            years,
            pluralize("year", years),
            remaining,
            pluralize("month", remaining)
        )
    } else {
        format!(
            "It will take {} {} to repay this loan!",
            remaining,
            pluralize("month", remaining)
        )
    }
}
