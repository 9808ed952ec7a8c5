use std::time::Duration;

use client::{NewInvestment, Poller, Stores, TransferRequest};
use ledger::{Account, MoneyCents, analytics, format::PRIVACY_MASK, history};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{AppConfig, Command, PASSWORD_ENV},
    error::{AppError, Result},
};

/// Fields holding money or prices in the JSON output.
const AMOUNT_FIELDS: &[&str] = &[
    "balance",
    "total_balance",
    "total_income",
    "total_expenses",
    "net",
    "amount_invested",
    "current_value",
    "average_price",
    "current_price",
];

/// Replaces every amount field with the privacy mask, at any depth.
fn mask_amounts(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(mask_amounts),
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                if AMOUNT_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(PRIVACY_MASK.to_string());
                } else {
                    mask_amounts(field);
                }
            }
        }
        _ => {}
    }
}

/// Runs one CLI command against an authenticated session.
pub struct Runner {
    stores: Stores,
    config: AppConfig,
    json: bool,
}

impl Runner {
    pub fn new(stores: Stores, config: AppConfig, json: bool) -> Self {
        if config.privacy {
            stores.ui.toggle_privacy();
        }
        Self {
            stores,
            config,
            json,
        }
    }

    /// Restores the session from the refresh cookie, logging in with the
    /// configured credentials when there is none.
    pub async fn authenticate(&self) -> Result<()> {
        self.stores.session.check_auth().await;
        if self.stores.session.is_authenticated().await {
            return Ok(());
        }
        if self.config.email.is_empty() {
            return Err(AppError::Credentials(
                "set `email` in the config file or pass --email".to_string(),
            ));
        }
        let password = std::env::var(PASSWORD_ENV)
            .map_err(|_| AppError::Credentials(format!("{PASSWORD_ENV} is not set")))?;
        self.stores
            .session
            .login(&self.config.email, &password)
            .await?;
        Ok(())
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Accounts => self.accounts().await,
            Command::History { account_id, limit } => {
                self.history(&account_id, limit.unwrap_or(self.config.history_len))
                    .await
            }
            Command::Summary => self.summary().await,
            Command::Transfer {
                source_account_id,
                target_account_number,
                amount,
                description,
            } => {
                let request = TransferRequest {
                    source_account_id,
                    target_account_number,
                    amount: amount.parse::<MoneyCents>()?,
                    description,
                };
                self.stores.accounts.execute_transfer(request).await?;
                self.stores
                    .alerts
                    .success("Transfer sent", "The ledger accepted the transfer")
                    .await;
                self.print_alerts().await;
                self.accounts().await
            }
            Command::CreateAccount { number, kind } => {
                self.stores
                    .accounts
                    .create_account(&number, kind.into())
                    .await?;
                self.accounts().await
            }
            Command::DeleteAccount { account_id } => {
                self.stores.accounts.delete_account(&account_id).await?;
                self.accounts().await
            }
            Command::Investments => self.investments().await,
            Command::Buy {
                symbol,
                name,
                kind,
                quantity,
                price,
            } => {
                let name = name.unwrap_or_else(|| symbol.clone());
                self.stores
                    .investments
                    .add_investment(NewInvestment {
                        symbol,
                        name,
                        kind,
                        quantity,
                        price,
                    })
                    .await?;
                self.investments().await
            }
            Command::Watch => self.watch().await,
        }
    }

    /// Reuses what a previous write already loaded.
    async fn loaded_accounts(&self) -> Result<Vec<Account>> {
        let state = self.stores.accounts.snapshot().await;
        if state.accounts.is_empty() || state.error.is_some() {
            self.stores.accounts.fetch_accounts().await?;
        }
        Ok(self.stores.accounts.accounts().await)
    }

    fn amount(&self, amount: MoneyCents) -> String {
        self.stores.ui.format_amount(amount)
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut value = serde_json::to_value(value)?;
        if self.stores.ui.is_privacy_mode() {
            mask_amounts(&mut value);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }

    async fn print_alerts(&self) {
        for alert in self.stores.alerts.alerts().await {
            println!("[{:?}] {}: {}", alert.level, alert.title, alert.message);
        }
    }

    async fn accounts(&self) -> Result<()> {
        let accounts = self.loaded_accounts().await?;
        if self.json {
            return self.print_json(&analytics::breakdown(&accounts));
        }
        if accounts.is_empty() {
            println!("No accounts yet.");
            return Ok(());
        }
        for account in &accounts {
            println!(
                "{:<12} {:<32} {:<10} {:>16} {:>4} tx{}",
                account.id,
                account.account_number,
                account.kind.label(),
                self.amount(account.balance),
                account.transactions().len(),
                if account.active { "" } else { " (inactive)" }
            );
        }
        Ok(())
    }

    async fn history(&self, account_id: &str, limit: usize) -> Result<()> {
        let accounts = self.loaded_accounts().await?;
        let account = accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| AppError::UnknownAccount(account_id.to_string()))?;
        let points = history::reconstruct_points(
            &account.id,
            account.balance,
            account.transactions(),
            limit,
        );
        if self.json {
            return self.print_json(&points);
        }
        for point in points {
            let when = point
                .as_of
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "start".to_string());
            println!("{when:<16} {:>16}", self.amount(point.balance));
        }
        Ok(())
    }

    async fn summary(&self) -> Result<()> {
        let accounts = self.loaded_accounts().await?;
        let summary = analytics::summarize(&accounts);
        if self.json {
            return self.print_json(&summary);
        }
        println!("Accounts:     {}", summary.account_count);
        println!("Transactions: {}", summary.transaction_count);
        println!("Balance:      {}", self.amount(summary.total_balance));
        println!("Income:       {}", self.amount(summary.total_income));
        println!("Expenses:     {}", self.amount(summary.total_expenses));
        println!("Net:          {}", self.amount(summary.net));
        Ok(())
    }

    async fn investments(&self) -> Result<()> {
        self.stores.investments.fetch_investments().await?;
        let state = self.stores.investments.snapshot().await;
        if self.json {
            return self.print_json(&state.investments);
        }
        if state.investments.is_empty() {
            println!("No investments yet.");
            return Ok(());
        }
        for position in &state.investments {
            println!(
                "{:<8} {:<24} {:>12} {:>16} {:>16} {:>8}%",
                position.symbol,
                position.name,
                position.quantity,
                self.amount(position.amount_invested),
                self.amount(position.current_value),
                position.roi_percent
            );
        }
        Ok(())
    }

    async fn watch(&self) -> Result<()> {
        let period = Duration::from_secs(self.config.poll_interval_secs.max(1));
        self.stores.accounts.fetch_accounts().await?;
        let _poller = Poller::spawn(self.stores.accounts.clone(), period);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("stopping watch");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let accounts = self.stores.accounts.accounts().await;
                    let summary = analytics::summarize(&accounts);
                    println!(
                        "{} accounts, balance {}, net {}",
                        summary.account_count,
                        self.amount(summary.total_balance),
                        self.amount(summary.net)
                    );
                }
            }
        }
    }
}
