use checkout_engine::domain::fees::compute_totals;
use checkout_engine::domain::method::{BankType, PaymentMethod, WalletId};
use checkout_engine::domain::money::Amount;
use checkout_engine::domain::ports::{PaymentProcessorBox, ProfileStoreBox, WalletAuthorizerBox};
use checkout_engine::domain::settlement::{MethodPayload, PaymentRequest};
use checkout_engine::infrastructure::in_memory::InMemoryProfileStore;
use checkout_engine::infrastructure::simulated::{SimulatedProcessor, SimulatedWalletAuthorizer};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let profiles: ProfileStoreBox = Box::new(InMemoryProfileStore::with_demo_profiles());
    let processor: PaymentProcessorBox = Box::new(SimulatedProcessor::instant_approve());
    let wallets: WalletAuthorizerBox = Box::new(SimulatedWalletAuthorizer::instant());

    let request = PaymentRequest {
        method: PaymentMethod::Bank,
        payload: MethodPayload::Bank {
            bank_type: BankType::Us,
            routing: "021000021".into(),
            account: "12345678".into(),
        },
        totals: compute_totals(Amount::new(dec!(25)), PaymentMethod::Bank),
        payer_email: None,
    };

    // Verify Send + Sync by spawning tasks
    let profile_handle = tokio::spawn(async move { profiles.find("personal").await.unwrap() });
    let processor_handle = tokio::spawn(async move { processor.submit(request).await.unwrap() });
    let wallet_handle = tokio::spawn(async move { wallets.authorize(WalletId::Phantom).await });

    let profile = profile_handle.await.unwrap().unwrap();
    assert_eq!(profile.name_on_card, "Alex Morgan");

    let outcome = processor_handle.await.unwrap();
    assert_eq!(outcome.total, Amount::new(dec!(25.25)));
    assert_eq!(outcome.fee(), Amount::new(dec!(0.25)));

    assert!(wallet_handle.await.unwrap().is_ok());
}
