use crate::config::Credentials;
use crate::domain::actor::{Actor, Role};
use crate::domain::money::{Amount, Balance};
use crate::domain::ports::PlatformApi;
use crate::error::{PlatformError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// Phone number of the platform's own treasury account.
pub const SYSTEM_ACCOUNT: &str = "SYSTEM";

pub const SYSTEM_TO_AGENT: Decimal = dec!(2000);
pub const AGENT_TO_CUSTOMER1_DEPOSIT: Decimal = dec!(1500);
pub const CUSTOMER1_WITHDRAWAL: Decimal = dec!(500);
pub const CUSTOMER1_TO_CUSTOMER2: Decimal = dec!(500);
pub const CUSTOMER2_TO_MERCHANT: Decimal = dec!(100);

/// Fee the platform is assumed to charge customer2, as a fraction of the
/// amount customer2 received. Owned by the platform; if its fee policy changes,
/// only this constant needs updating.
pub const ASSUMED_FEE_RATE: Decimal = dec!(0.01);

const DEPOSIT_CONFIRMATION: &str = "Deposit successful";

/// Balance customer2 must hold once the scenario has run: 500 - 100 - 5 = 395.
pub fn expected_customer2_balance() -> Balance {
    let received = Balance::new(CUSTOMER1_TO_CUSTOMER2);
    received - Balance::new(CUSTOMER2_TO_MERCHANT) - received * ASSUMED_FEE_RATE
}

/// The steps of the transaction flow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStep {
    Authenticate,
    CreateTwoCustomers,
    CreateAgent,
    CreateMerchant,
    SeedAgentFromSystem,
    AgentDepositsToCustomer1,
    Customer1WithdrawsToAgent,
    Customer1SendsToCustomer2,
    Customer2PaysMerchant,
    VerifyCustomer2Balance,
}

impl ScenarioStep {
    pub const FIRST: ScenarioStep = ScenarioStep::Authenticate;

    /// The step that follows this one, or `None` once the flow is complete.
    pub fn next(self) -> Option<ScenarioStep> {
        use ScenarioStep::*;
        match self {
            Authenticate => Some(CreateTwoCustomers),
            CreateTwoCustomers => Some(CreateAgent),
            CreateAgent => Some(CreateMerchant),
            CreateMerchant => Some(SeedAgentFromSystem),
            SeedAgentFromSystem => Some(AgentDepositsToCustomer1),
            AgentDepositsToCustomer1 => Some(Customer1WithdrawsToAgent),
            Customer1WithdrawsToAgent => Some(Customer1SendsToCustomer2),
            Customer1SendsToCustomer2 => Some(Customer2PaysMerchant),
            Customer2PaysMerchant => Some(VerifyCustomer2Balance),
            VerifyCustomer2Balance => None,
        }
    }

    pub fn description(self) -> &'static str {
        use ScenarioStep::*;
        match self {
            Authenticate => "Authenticating",
            CreateTwoCustomers => "Creating 2 customers",
            CreateAgent => "Creating 1 agent",
            CreateMerchant => "Creating 1 merchant",
            SeedAgentFromSystem => "System -> Agent (2000 TK)",
            AgentDepositsToCustomer1 => "Agent -> Customer1 Deposit (1500 TK)",
            Customer1WithdrawsToAgent => "Customer1 -> Agent Withdraw (500 TK)",
            Customer1SendsToCustomer2 => "Customer1 -> Customer2 Send Money (500 TK)",
            Customer2PaysMerchant => "Customer2 -> Merchant Payment (100 TK)",
            VerifyCustomer2Balance => "Checking Customer2 balance",
        }
    }
}

impl fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub customer1: Actor,
    pub customer2: Actor,
    pub agent: Actor,
    pub merchant: Actor,
    pub customer2_balance: Balance,
    pub completed: Vec<ScenarioStep>,
}

/// Actors created so far, threaded from step to step.
#[derive(Default)]
struct Cast {
    customer1: Option<Actor>,
    customer2: Option<Actor>,
    agent: Option<Actor>,
    merchant: Option<Actor>,
    customer2_balance: Option<Balance>,
}

fn require<'a>(actor: &'a Option<Actor>, role: Role, step: ScenarioStep) -> Result<&'a Actor> {
    actor.as_ref().ok_or_else(|| {
        PlatformError::UnexpectedResponse(format!("{step}: no {role} has been created yet"))
    })
}

fn with_id(actor: Actor) -> Result<Actor> {
    match actor.id {
        Some(_) => Ok(actor),
        None => Err(PlatformError::MissingActorId(actor.role)),
    }
}

/// Drives the complete Dmoney transaction flow against a platform.
///
/// Steps run strictly in order; the first failure aborts the run.
pub struct TransactionFlow<P: PlatformApi> {
    platform: P,
    credentials: Credentials,
}

impl<P: PlatformApi> TransactionFlow<P> {
    pub fn new(platform: P, credentials: Credentials) -> Self {
        Self {
            platform,
            credentials,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    pub async fn run(&mut self) -> Result<ScenarioReport> {
        let mut cast = Cast::default();
        let mut completed = Vec::new();
        let mut step = Some(ScenarioStep::FIRST);

        while let Some(current) = step {
            eprintln!("Step {}: {}...", completed.len(), current);
            self.execute(current, &mut cast).await?;
            completed.push(current);
            step = current.next();
        }

        let done = ScenarioStep::VerifyCustomer2Balance;
        let report = ScenarioReport {
            customer1: require(&cast.customer1, Role::Customer, done)?.clone(),
            customer2: require(&cast.customer2, Role::Customer, done)?.clone(),
            agent: require(&cast.agent, Role::Agent, done)?.clone(),
            merchant: require(&cast.merchant, Role::Merchant, done)?.clone(),
            customer2_balance: cast.customer2_balance.ok_or_else(|| {
                PlatformError::UnexpectedResponse(format!("{done}: no balance was recorded"))
            })?,
            completed,
        };
        eprintln!(
            "Customer2 balance verified: {} TK (including {} TK fee)",
            report.customer2_balance,
            Balance::new(CUSTOMER1_TO_CUSTOMER2) * ASSUMED_FEE_RATE
        );
        Ok(report)
    }

    async fn execute(&mut self, step: ScenarioStep, cast: &mut Cast) -> Result<()> {
        use ScenarioStep::*;
        match step {
            Authenticate => match &self.credentials {
                Credentials::Token(token) => {
                    eprintln!("Using configured admin token");
                    self.platform.set_token(token.clone());
                }
                Credentials::Login { email, password } => {
                    self.platform.login(email, password).await?;
                }
            },
            CreateTwoCustomers => {
                cast.customer1 = Some(with_id(self.platform.create_customer().await?)?);
                cast.customer2 = Some(with_id(self.platform.create_customer().await?)?);
            }
            CreateAgent => {
                cast.agent = Some(with_id(self.platform.create_agent().await?)?);
            }
            CreateMerchant => {
                cast.merchant = Some(with_id(self.platform.create_merchant().await?)?);
            }
            SeedAgentFromSystem => {
                let agent = require(&cast.agent, Role::Agent, step)?;
                let receipt = self
                    .platform
                    .deposit(SYSTEM_ACCOUNT, &agent.phone, Amount::new(SYSTEM_TO_AGENT)?)
                    .await?;
                if !receipt
                    .message()
                    .is_some_and(|m| m.contains(DEPOSIT_CONFIRMATION))
                {
                    return Err(PlatformError::UnexpectedResponse(format!(
                        "System deposit was not confirmed: {}",
                        receipt.payload
                    )));
                }
            }
            AgentDepositsToCustomer1 => {
                let agent = require(&cast.agent, Role::Agent, step)?;
                let customer1 = require(&cast.customer1, Role::Customer, step)?;
                self.platform
                    .deposit(
                        &agent.phone,
                        &customer1.phone,
                        Amount::new(AGENT_TO_CUSTOMER1_DEPOSIT)?,
                    )
                    .await?;
            }
            Customer1WithdrawsToAgent => {
                let customer1 = require(&cast.customer1, Role::Customer, step)?;
                let agent = require(&cast.agent, Role::Agent, step)?;
                self.platform
                    .withdraw(
                        &customer1.phone,
                        &agent.phone,
                        Amount::new(CUSTOMER1_WITHDRAWAL)?,
                    )
                    .await?;
            }
            Customer1SendsToCustomer2 => {
                let customer1 = require(&cast.customer1, Role::Customer, step)?;
                let customer2 = require(&cast.customer2, Role::Customer, step)?;
                self.platform
                    .send_money(
                        &customer1.phone,
                        &customer2.phone,
                        Amount::new(CUSTOMER1_TO_CUSTOMER2)?,
                    )
                    .await?;
            }
            Customer2PaysMerchant => {
                let customer2 = require(&cast.customer2, Role::Customer, step)?;
                let merchant = require(&cast.merchant, Role::Merchant, step)?;
                self.platform
                    .payment(
                        &customer2.phone,
                        &merchant.phone,
                        Amount::new(CUSTOMER2_TO_MERCHANT)?,
                    )
                    .await?;
            }
            VerifyCustomer2Balance => {
                let customer2 = require(&cast.customer2, Role::Customer, step)?;
                let actual = self.platform.check_balance(&customer2.phone).await?;
                let expected = expected_customer2_balance();
                if actual != expected {
                    return Err(PlatformError::BalanceMismatch {
                        phone: customer2.phone.clone(),
                        expected,
                        actual,
                    });
                }
                cast.customer2_balance = Some(actual);
            }
        }
        Ok(())
    }
}
