//! Dashboard figures derived from the working set.

use serde::Serialize;

use crate::domain::customer::{CustomerRecord, PaymentType};
use crate::domain::money::Money;

/// Customer head counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCounts {
    pub customer_count: usize,
    // Key spelled the way the dashboard client reads it.
    #[serde(rename = "piadCustomerCount")]
    pub paid_customer_count: usize,
    #[serde(rename = "unPaidCustomerCount")]
    pub unpaid_customer_count: usize,
    pub full_payment_type_customer_count: usize,
    pub settlement_payment_type_customer_count: usize,
    pub partial_payment_type_customer_count: usize,
}

/// Amount sums, each in total and over paid customers only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    #[serde(rename = "foreClosureSum")]
    pub foreclosure_sum: Money,
    #[serde(rename = "paidForeClosureSum")]
    pub paid_foreclosure_sum: Money,
    pub settlement_sum: Money,
    pub paid_settlement_sum: Money,
    pub partial_sum: Money,
    pub paid_partial_sum: Money,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkingSetMetrics {
    pub customers: CustomerCounts,
    pub payments: PaymentTotals,
}

impl WorkingSetMetrics {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CustomerRecord>,
    {
        let mut metrics = Self::default();
        for record in records {
            metrics.add(record);
        }
        metrics
    }

    fn add(&mut self, record: &CustomerRecord) {
        let counts = &mut self.customers;
        counts.customer_count += 1;
        if record.is_paid {
            counts.paid_customer_count += 1;
        } else {
            counts.unpaid_customer_count += 1;
        }
        match record.payment_type {
            Some(PaymentType::Foreclosure) => counts.full_payment_type_customer_count += 1,
            Some(PaymentType::Settlement) => counts.settlement_payment_type_customer_count += 1,
            Some(PaymentType::PartPayment) => counts.partial_payment_type_customer_count += 1,
            None => {}
        }

        let totals = &mut self.payments;
        totals.foreclosure_sum = totals.foreclosure_sum + record.foreclosure;
        totals.settlement_sum = totals.settlement_sum + record.settlement;
        totals.partial_sum = totals.partial_sum + record.minimum_part_payment;
        if record.is_paid {
            totals.paid_foreclosure_sum = totals.paid_foreclosure_sum + record.foreclosure;
            totals.paid_settlement_sum = totals.paid_settlement_sum + record.settlement;
            totals.paid_partial_sum = totals.paid_partial_sum + record.minimum_part_payment;
        }
    }
}
