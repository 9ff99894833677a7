use crate::config::{CheckoutConfig, ProcessorMode};
use crate::domain::method::WalletId;
use crate::domain::ports::{PaymentProcessor, WalletAuthorizer};
use crate::domain::settlement::{PaymentRequest, SettlementOutcome};
use crate::error::{ProcessorFailure, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Stand-in for a real gateway: waits a random time within `latency`, then
/// approves or declines every request according to `mode`.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    latency: (Duration, Duration),
    mode: ProcessorMode,
}

impl SimulatedProcessor {
    pub fn new(latency: (Duration, Duration), mode: ProcessorMode) -> Self {
        Self { latency, mode }
    }

    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(config.processor_latency, config.processor_mode)
    }

    pub fn instant_approve() -> Self {
        Self::new((Duration::ZERO, Duration::ZERO), ProcessorMode::Approve)
    }

    pub fn instant_decline() -> Self {
        Self::new((Duration::ZERO, Duration::ZERO), ProcessorMode::Decline)
    }

    fn delay(&self) -> Duration {
        let (min, max) = self.latency;
        if max <= min {
            return min;
        }
        let millis = rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn submit(
        &self,
        request: PaymentRequest,
    ) -> std::result::Result<SettlementOutcome, ProcessorFailure> {
        let delay = self.delay();
        tracing::debug!(method = %request.method, ?delay, "processing payment");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.mode {
            ProcessorMode::Approve => Ok(SettlementOutcome::from_request(&request)),
            ProcessorMode::Decline => Err(ProcessorFailure::Declined(
                "the payment was not approved".to_string(),
            )),
        }
    }
}

/// Approves every wallet connection after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedWalletAuthorizer {
    latency: Duration,
}

impl SimulatedWalletAuthorizer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl WalletAuthorizer for SimulatedWalletAuthorizer {
    async fn authorize(&self, wallet: WalletId) -> Result<()> {
        tracing::debug!(%wallet, "waiting for wallet approval");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fees::compute_totals;
    use crate::domain::method::PaymentMethod;
    use crate::domain::money::Amount;
    use crate::domain::settlement::MethodPayload;
    use rust_decimal_macros::dec;

    fn request() -> PaymentRequest {
        PaymentRequest {
            method: PaymentMethod::ExpressGoogle,
            payload: MethodPayload::Express {
                method: PaymentMethod::ExpressGoogle,
            },
            totals: compute_totals(Amount::new(dec!(10)), PaymentMethod::ExpressGoogle),
            payer_email: None,
        }
    }

    #[tokio::test]
    async fn test_approve_echoes_totals() {
        let outcome = SimulatedProcessor::instant_approve()
            .submit(request())
            .await
            .unwrap();
        assert_eq!(outcome.amount, Amount::new(dec!(10)));
        assert_eq!(outcome.total, Amount::new(dec!(10.59)));
    }

    #[tokio::test]
    async fn test_decline() {
        let result = SimulatedProcessor::instant_decline().submit(request()).await;
        assert!(matches!(result, Err(ProcessorFailure::Declined(_))));
    }

    #[test]
    fn test_latency_is_within_range() {
        let processor = SimulatedProcessor::new(
            (Duration::from_millis(1200), Duration::from_millis(1800)),
            ProcessorMode::Approve,
        );
        for _ in 0..100 {
            let delay = processor.delay();
            assert!(delay >= Duration::from_millis(1200));
            assert!(delay <= Duration::from_millis(1800));
        }
    }

    #[test]
    fn test_fixed_latency() {
        let processor = SimulatedProcessor::new(
            (Duration::from_millis(5), Duration::from_millis(5)),
            ProcessorMode::Approve,
        );
        assert_eq!(processor.delay(), Duration::from_millis(5));
    }
}
