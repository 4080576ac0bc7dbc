//! Finance handlers: Bank, Currency, Country, Tax.

use std::sync::Arc;

use refdata_cache::Cache;
use refdata_core::{DomainResult, EntityId, Page, PageRequest, Referential, Violations};
use refdata_events::{EventBus, LifecycleEvent};
use refdata_finance::{
    Bank, BankFilter, BankId, BankPatch, Country, CountryFilter, CountryId, CountryPatch,
    Currency, CurrencyFilter, CurrencyId, CurrencyPatch, Tax, TaxFilter, TaxId, TaxPatch,
};
use refdata_store::{Repository, integrity};

use crate::support;

// -------------------------
// Commands & queries
// -------------------------

#[derive(Debug, Clone)]
pub struct CreateBank {
    pub code: String,
    pub name: String,
    pub swift: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateBank {
    pub id: BankId,
    pub code: String,
    pub name: String,
    pub swift: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PatchBank {
    pub id: BankId,
    pub patch: BankPatch,
}

#[derive(Debug, Clone)]
pub struct CreateCurrency {
    pub code: String,
    pub name: String,
    pub decimals: u8,
}

#[derive(Debug, Clone)]
pub struct UpdateCurrency {
    pub id: CurrencyId,
    pub code: String,
    pub name: String,
    pub decimals: u8,
}

#[derive(Debug, Clone)]
pub struct PatchCurrency {
    pub id: CurrencyId,
    pub patch: CurrencyPatch,
}

#[derive(Debug, Clone)]
pub struct CreateCountry {
    pub currency_id: CurrencyId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCountry {
    pub id: CountryId,
    pub currency_id: CurrencyId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchCountry {
    pub id: CountryId,
    pub patch: CountryPatch,
}

#[derive(Debug, Clone)]
pub struct CreateTax {
    pub code: String,
    pub code_en: String,
    pub code_ar: String,
    pub description: Option<String>,
    pub rate_bps: u32,
}

#[derive(Debug, Clone)]
pub struct UpdateTax {
    pub id: TaxId,
    pub code: String,
    pub code_en: String,
    pub code_ar: String,
    pub description: Option<String>,
    pub rate_bps: u32,
}

#[derive(Debug, Clone)]
pub struct PatchTax {
    pub id: TaxId,
    pub patch: TaxPatch,
}

#[derive(Debug, Clone, Default)]
pub struct ListBanks {
    pub filter: BankFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListCurrencies {
    pub filter: CurrencyFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListCountries {
    pub filter: CountryFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListTaxes {
    pub filter: TaxFilter,
    pub page: Option<PageRequest>,
}

fn code_name_rules(code: &str, name: &str) -> DomainResult<()> {
    let mut rules = Violations::new();
    rules.require_non_blank(code, "code");
    rules.require_non_blank(name, "name");
    rules.finish()
}

fn tax_rules(code: &str, code_en: &str, code_ar: &str) -> DomainResult<()> {
    let mut rules = Violations::new();
    rules.require_non_blank(code, "code");
    rules.require_non_blank(code_en, "code_en");
    rules.require_non_blank(code_ar, "code_ar");
    rules.finish()
}

fn default_page() -> PageRequest {
    PageRequest::new(1, 20).expect("default page request is valid")
}

// -------------------------
// Handlers
// -------------------------

pub struct FinanceRegistry {
    banks: Arc<dyn Repository<Bank>>,
    currencies: Arc<dyn Repository<Currency>>,
    countries: Arc<dyn Repository<Country>>,
    taxes: Arc<dyn Repository<Tax>>,
    cache: Arc<dyn Cache>,
    bus: Arc<dyn EventBus<LifecycleEvent>>,
}

impl FinanceRegistry {
    pub fn new(
        banks: Arc<dyn Repository<Bank>>,
        currencies: Arc<dyn Repository<Currency>>,
        countries: Arc<dyn Repository<Country>>,
        taxes: Arc<dyn Repository<Tax>>,
        cache: Arc<dyn Cache>,
        bus: Arc<dyn EventBus<LifecycleEvent>>,
    ) -> Self {
        Self {
            banks,
            currencies,
            countries,
            taxes,
            cache,
            bus,
        }
    }

    // --- Bank ---

    pub async fn create_bank(&self, cmd: CreateBank) -> DomainResult<BankId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = BankId::new(EntityId::new());
        integrity::ensure_unique(
            self.banks.as_ref(),
            BankFilter {
                code: Some(cmd.code.clone()),
                ..BankFilter::default()
            },
            &id,
            Bank::KIND,
            &cmd.code,
        )
        .await?;

        let bank = Bank::create(id, cmd.code, cmd.name, cmd.swift);
        self.banks.add(bank).await?;
        let events = self.banks.save().await?;

        support::invalidate(self.cache.as_ref(), Bank::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_bank(&self, cmd: UpdateBank) -> DomainResult<BankId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut bank = integrity::fetch(self.banks.as_ref(), &cmd.id, Bank::KIND).await?;
        integrity::ensure_unique(
            self.banks.as_ref(),
            BankFilter {
                code: Some(cmd.code.clone()),
                ..BankFilter::default()
            },
            &cmd.id,
            Bank::KIND,
            &cmd.code,
        )
        .await?;

        bank.update(cmd.code, cmd.name, cmd.swift);
        self.banks.update(bank.clone()).await?;
        let events = self.banks.save().await?;

        support::refresh(self.cache.as_ref(), &bank).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_bank(&self, cmd: PatchBank) -> DomainResult<BankId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut bank = integrity::fetch(self.banks.as_ref(), &cmd.id, Bank::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.banks.as_ref(),
                BankFilter {
                    code: Some(code.clone()),
                    ..BankFilter::default()
                },
                &cmd.id,
                Bank::KIND,
                code,
            )
            .await?;
        }

        bank.patch(cmd.patch);
        self.banks.update(bank).await?;
        let events = self.banks.save().await?;

        support::invalidate(self.cache.as_ref(), Bank::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_bank(&self, id: BankId) -> DomainResult<bool> {
        let mut bank = integrity::fetch(self.banks.as_ref(), &id, Bank::KIND).await?;
        bank.disable();
        self.banks.update(bank).await?;
        let events = self.banks.save().await?;

        support::invalidate(self.cache.as_ref(), Bank::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_bank(&self, id: BankId) -> DomainResult<bool> {
        let mut bank = integrity::fetch(self.banks.as_ref(), &id, Bank::KIND).await?;
        bank.activate();
        self.banks.update(bank).await?;
        let events = self.banks.save().await?;

        support::invalidate(self.cache.as_ref(), Bank::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_bank(&self, id: &BankId) -> DomainResult<Bank> {
        support::cached_get(self.cache.as_ref(), self.banks.as_ref(), id, Bank::KIND).await
    }

    pub async fn list_banks(&self, query: ListBanks) -> DomainResult<Page<Bank>> {
        let page = query.page.unwrap_or_else(default_page);
        self.banks.page(&query.filter, &page).await
    }

    // --- Currency ---

    pub async fn create_currency(&self, cmd: CreateCurrency) -> DomainResult<CurrencyId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = CurrencyId::new(EntityId::new());
        integrity::ensure_unique(
            self.currencies.as_ref(),
            CurrencyFilter {
                code: Some(cmd.code.clone()),
                ..CurrencyFilter::default()
            },
            &id,
            Currency::KIND,
            &cmd.code,
        )
        .await?;

        let currency = Currency::create(id, cmd.code, cmd.name, cmd.decimals);
        self.currencies.add(currency).await?;
        let events = self.currencies.save().await?;

        support::invalidate(self.cache.as_ref(), Currency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_currency(&self, cmd: UpdateCurrency) -> DomainResult<CurrencyId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut currency =
            integrity::fetch(self.currencies.as_ref(), &cmd.id, Currency::KIND).await?;
        integrity::ensure_unique(
            self.currencies.as_ref(),
            CurrencyFilter {
                code: Some(cmd.code.clone()),
                ..CurrencyFilter::default()
            },
            &cmd.id,
            Currency::KIND,
            &cmd.code,
        )
        .await?;

        currency.update(cmd.code, cmd.name, cmd.decimals);
        self.currencies.update(currency.clone()).await?;
        let events = self.currencies.save().await?;

        support::refresh(self.cache.as_ref(), &currency).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_currency(&self, cmd: PatchCurrency) -> DomainResult<CurrencyId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut currency =
            integrity::fetch(self.currencies.as_ref(), &cmd.id, Currency::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.currencies.as_ref(),
                CurrencyFilter {
                    code: Some(code.clone()),
                    ..CurrencyFilter::default()
                },
                &cmd.id,
                Currency::KIND,
                code,
            )
            .await?;
        }

        currency.patch(cmd.patch);
        self.currencies.update(currency).await?;
        let events = self.currencies.save().await?;

        support::invalidate(self.cache.as_ref(), Currency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    /// A currency still named as legal tender by an enabled country stays.
    pub async fn disable_currency(&self, id: CurrencyId) -> DomainResult<bool> {
        let mut currency = integrity::fetch(self.currencies.as_ref(), &id, Currency::KIND).await?;
        integrity::ensure_not_in_use(
            self.countries.as_ref(),
            CountryFilter {
                currency_id: Some(id),
                ..CountryFilter::default()
            },
            Currency::KIND,
            Country::KIND,
        )
        .await?;

        currency.disable();
        self.currencies.update(currency).await?;
        let events = self.currencies.save().await?;

        support::invalidate(self.cache.as_ref(), Currency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_currency(&self, id: CurrencyId) -> DomainResult<bool> {
        let mut currency = integrity::fetch(self.currencies.as_ref(), &id, Currency::KIND).await?;
        currency.activate();
        self.currencies.update(currency).await?;
        let events = self.currencies.save().await?;

        support::invalidate(self.cache.as_ref(), Currency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_currency(&self, id: &CurrencyId) -> DomainResult<Currency> {
        support::cached_get(self.cache.as_ref(), self.currencies.as_ref(), id, Currency::KIND)
            .await
    }

    pub async fn list_currencies(&self, query: ListCurrencies) -> DomainResult<Page<Currency>> {
        let page = query.page.unwrap_or_else(default_page);
        self.currencies.page(&query.filter, &page).await
    }

    // --- Country ---

    pub async fn create_country(&self, cmd: CreateCountry) -> DomainResult<CountryId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = CountryId::new(EntityId::new());
        integrity::ensure_unique(
            self.countries.as_ref(),
            CountryFilter {
                code: Some(cmd.code.clone()),
                ..CountryFilter::default()
            },
            &id,
            Country::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.currencies.as_ref(), &cmd.currency_id, Currency::KIND)
            .await?;

        let country = Country::create(id, cmd.currency_id, cmd.code, cmd.name);
        self.countries.add(country).await?;
        let events = self.countries.save().await?;

        support::invalidate(self.cache.as_ref(), Country::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_country(&self, cmd: UpdateCountry) -> DomainResult<CountryId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut country = integrity::fetch(self.countries.as_ref(), &cmd.id, Country::KIND).await?;
        integrity::ensure_unique(
            self.countries.as_ref(),
            CountryFilter {
                code: Some(cmd.code.clone()),
                ..CountryFilter::default()
            },
            &cmd.id,
            Country::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.currencies.as_ref(), &cmd.currency_id, Currency::KIND)
            .await?;

        country.update(cmd.currency_id, cmd.code, cmd.name);
        self.countries.update(country.clone()).await?;
        let events = self.countries.save().await?;

        support::refresh(self.cache.as_ref(), &country).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_country(&self, cmd: PatchCountry) -> DomainResult<CountryId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut country = integrity::fetch(self.countries.as_ref(), &cmd.id, Country::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.countries.as_ref(),
                CountryFilter {
                    code: Some(code.clone()),
                    ..CountryFilter::default()
                },
                &cmd.id,
                Country::KIND,
                code,
            )
            .await?;
        }
        if let Some(currency_id) = &cmd.patch.currency_id {
            integrity::ensure_exists(self.currencies.as_ref(), currency_id, Currency::KIND)
                .await?;
        }

        country.patch(cmd.patch);
        self.countries.update(country).await?;
        let events = self.countries.save().await?;

        support::invalidate(self.cache.as_ref(), Country::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_country(&self, id: CountryId) -> DomainResult<bool> {
        let mut country = integrity::fetch(self.countries.as_ref(), &id, Country::KIND).await?;
        country.disable();
        self.countries.update(country).await?;
        let events = self.countries.save().await?;

        support::invalidate(self.cache.as_ref(), Country::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_country(&self, id: CountryId) -> DomainResult<bool> {
        let mut country = integrity::fetch(self.countries.as_ref(), &id, Country::KIND).await?;
        country.activate();
        self.countries.update(country).await?;
        let events = self.countries.save().await?;

        support::invalidate(self.cache.as_ref(), Country::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_country(&self, id: &CountryId) -> DomainResult<Country> {
        support::cached_get(self.cache.as_ref(), self.countries.as_ref(), id, Country::KIND)
            .await
    }

    pub async fn list_countries(&self, query: ListCountries) -> DomainResult<Page<Country>> {
        let page = query.page.unwrap_or_else(default_page);
        self.countries.page(&query.filter, &page).await
    }

    // --- Tax ---

    pub async fn create_tax(&self, cmd: CreateTax) -> DomainResult<TaxId> {
        tax_rules(&cmd.code, &cmd.code_en, &cmd.code_ar)?;
        let id = TaxId::new(EntityId::new());
        integrity::ensure_unique(
            self.taxes.as_ref(),
            TaxFilter {
                code: Some(cmd.code.clone()),
                ..TaxFilter::default()
            },
            &id,
            Tax::KIND,
            &cmd.code,
        )
        .await?;

        let tax = Tax::create(id, cmd.code, cmd.code_en, cmd.code_ar, cmd.description, cmd.rate_bps);
        self.taxes.add(tax).await?;
        let events = self.taxes.save().await?;

        support::invalidate(self.cache.as_ref(), Tax::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_tax(&self, cmd: UpdateTax) -> DomainResult<TaxId> {
        tax_rules(&cmd.code, &cmd.code_en, &cmd.code_ar)?;
        let mut tax = integrity::fetch(self.taxes.as_ref(), &cmd.id, Tax::KIND).await?;
        integrity::ensure_unique(
            self.taxes.as_ref(),
            TaxFilter {
                code: Some(cmd.code.clone()),
                ..TaxFilter::default()
            },
            &cmd.id,
            Tax::KIND,
            &cmd.code,
        )
        .await?;

        tax.update(cmd.code, cmd.code_en, cmd.code_ar, cmd.description, cmd.rate_bps);
        self.taxes.update(tax.clone()).await?;
        let events = self.taxes.save().await?;

        support::refresh(self.cache.as_ref(), &tax).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_tax(&self, cmd: PatchTax) -> DomainResult<TaxId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(code_en) = cmd.patch.code_en.as_deref() {
            rules.require_non_blank(code_en, "code_en");
        }
        if let Some(code_ar) = cmd.patch.code_ar.as_deref() {
            rules.require_non_blank(code_ar, "code_ar");
        }
        rules.finish()?;

        let mut tax = integrity::fetch(self.taxes.as_ref(), &cmd.id, Tax::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.taxes.as_ref(),
                TaxFilter {
                    code: Some(code.clone()),
                    ..TaxFilter::default()
                },
                &cmd.id,
                Tax::KIND,
                code,
            )
            .await?;
        }

        tax.patch(cmd.patch);
        self.taxes.update(tax).await?;
        let events = self.taxes.save().await?;

        support::invalidate(self.cache.as_ref(), Tax::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_tax(&self, id: TaxId) -> DomainResult<bool> {
        let mut tax = integrity::fetch(self.taxes.as_ref(), &id, Tax::KIND).await?;
        tax.disable();
        self.taxes.update(tax).await?;
        let events = self.taxes.save().await?;

        support::invalidate(self.cache.as_ref(), Tax::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_tax(&self, id: TaxId) -> DomainResult<bool> {
        let mut tax = integrity::fetch(self.taxes.as_ref(), &id, Tax::KIND).await?;
        tax.activate();
        self.taxes.update(tax).await?;
        let events = self.taxes.save().await?;

        support::invalidate(self.cache.as_ref(), Tax::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_tax(&self, id: &TaxId) -> DomainResult<Tax> {
        support::cached_get(self.cache.as_ref(), self.taxes.as_ref(), id, Tax::KIND).await
    }

    pub async fn list_taxes(&self, query: ListTaxes) -> DomainResult<Page<Tax>> {
        let page = query.page.unwrap_or_else(default_page);
        self.taxes.page(&query.filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_cache::MemoryCache;
    use refdata_core::DomainError;
    use refdata_events::InMemoryEventBus;
    use refdata_store::MemoryRepository;

    fn registry() -> FinanceRegistry {
        FinanceRegistry::new(
            Arc::new(MemoryRepository::<Bank>::new()),
            Arc::new(MemoryRepository::<Currency>::new()),
            Arc::new(MemoryRepository::<Country>::new()),
            Arc::new(MemoryRepository::<Tax>::new()),
            Arc::new(MemoryCache::new()),
            Arc::new(InMemoryEventBus::<LifecycleEvent>::new()),
        )
    }

    #[tokio::test]
    async fn second_bank_with_the_same_code_is_rejected() {
        let reg = registry();
        reg.create_bank(CreateBank {
            code: "AWB".into(),
            name: "Attijariwafa Bank".into(),
            swift: None,
        })
        .await
        .unwrap();

        let err = reg
            .create_bank(CreateBank {
                code: "AWB".into(),
                name: "Another Wannabe Bank".into(),
                swift: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));

        // A different code goes through.
        reg.create_bank(CreateBank {
            code: "AWB2".into(),
            name: "Attijariwafa Europe".into(),
            swift: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn bank_codes_collide_case_insensitively() {
        let reg = registry();
        reg.create_bank(CreateBank {
            code: "AWB".into(),
            name: "Attijariwafa Bank".into(),
            swift: None,
        })
        .await
        .unwrap();

        let err = reg
            .create_bank(CreateBank {
                code: "awb".into(),
                name: "Lowercase clone".into(),
                swift: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn a_disabled_bank_frees_its_code() {
        let reg = registry();
        let id = reg
            .create_bank(CreateBank {
                code: "AWB".into(),
                name: "Attijariwafa Bank".into(),
                swift: None,
            })
            .await
            .unwrap();
        reg.disable_bank(id).await.unwrap();

        // Uniqueness holds among enabled records only.
        reg.create_bank(CreateBank {
            code: "AWB".into(),
            name: "Attijariwafa Bank (new)".into(),
            swift: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn patching_only_the_tax_code_keeps_the_bilingual_labels() {
        let reg = registry();
        let id = reg
            .create_tax(CreateTax {
                code: "VAT20".into(),
                code_en: "VAT".into(),
                code_ar: "ض.ق.م".into(),
                description: Some("Standard rate".into()),
                rate_bps: 2000,
            })
            .await
            .unwrap();

        reg.patch_tax(PatchTax {
            id,
            patch: TaxPatch {
                code: Some("VAT-STD".into()),
                ..TaxPatch::default()
            },
        })
        .await
        .unwrap();

        let tax = reg.get_tax(&id).await.unwrap();
        assert_eq!(tax.code(), "VAT-STD");
        assert_eq!(tax.code_en(), "VAT");
        assert_eq!(tax.code_ar(), "ض.ق.م");
        assert_eq!(tax.description(), Some("Standard rate"));
    }

    #[tokio::test]
    async fn currency_in_use_by_a_country_cannot_be_disabled() {
        let reg = registry();
        let mad = reg
            .create_currency(CreateCurrency {
                code: "MAD".into(),
                name: "Moroccan Dirham".into(),
                decimals: 2,
            })
            .await
            .unwrap();
        reg.create_country(CreateCountry {
            currency_id: mad,
            code: "MA".into(),
            name: "Morocco".into(),
        })
        .await
        .unwrap();

        let err = reg.disable_currency(mad).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::resource_in_use(Currency::KIND, Country::KIND)
        );
        assert!(reg.get_currency(&mad).await.unwrap().is_enabled());
    }

    #[tokio::test]
    async fn country_creation_requires_an_enabled_currency() {
        let reg = registry();
        let ghost = CurrencyId::new(EntityId::new());
        let err = reg
            .create_country(CreateCountry {
                currency_id: ghost,
                code: "MA".into(),
                name: "Morocco".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ReferenceNotFound { .. }));
    }

    #[tokio::test]
    async fn get_after_update_is_served_the_fresh_record() {
        let reg = registry();
        let id = reg
            .create_bank(CreateBank {
                code: "BCP".into(),
                name: "Banque Populaire".into(),
                swift: None,
            })
            .await
            .unwrap();

        // Warm the cache, then update through the handler.
        assert_eq!(reg.get_bank(&id).await.unwrap().name(), "Banque Populaire");
        reg.update_bank(UpdateBank {
            id,
            code: "BCP".into(),
            name: "Banque Centrale Populaire".into(),
            swift: Some("BCPOMAMC".into()),
        })
        .await
        .unwrap();

        let bank = reg.get_bank(&id).await.unwrap();
        assert_eq!(bank.name(), "Banque Centrale Populaire");
        assert_eq!(bank.swift(), Some("BCPOMAMC"));
    }

    #[tokio::test]
    async fn unknown_ids_surface_not_found() {
        let reg = registry();
        let ghost = BankId::new(EntityId::new());
        assert!(matches!(
            reg.get_bank(&ghost).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            reg.disable_bank(ghost).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
