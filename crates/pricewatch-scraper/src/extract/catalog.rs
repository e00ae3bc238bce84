//! Declarative plan catalogs for known competitors.
//!
//! Each site maps to an ordered list of rules: when every requirement of a
//! rule holds in the page text, the rule's predetermined plan is emitted.
//! Rules confirm that a plan still appears on the page; they never parse
//! prices out of markup, so a redesign rarely breaks them.

use pricewatch_core::Plan;

/// A substring test against the normalized page text.
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    Contains(&'static str),
    /// Matched against the lowercased text; the needle must be lowercase.
    ContainsIgnoreCase(&'static str),
    AnyOf(&'static [&'static str]),
}

/// Page text prepared once for every requirement check.
pub struct PredicateText<'a> {
    text: &'a str,
    lower: String,
}

impl<'a> PredicateText<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
        }
    }
}

impl Requirement {
    #[must_use]
    pub fn holds(&self, page: &PredicateText<'_>) -> bool {
        match self {
            Requirement::Contains(needle) => page.text.contains(needle),
            Requirement::ContainsIgnoreCase(needle) => page.lower.contains(needle),
            Requirement::AnyOf(needles) => needles.iter().any(|n| page.text.contains(n)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlanTemplate {
    pub name: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

impl PlanTemplate {
    #[must_use]
    pub fn to_plan(&self) -> Plan {
        Plan {
            name: self.name.to_string(),
            price: self.price.to_string(),
            description: self.description.to_string(),
            features: self.features.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

/// A plan emitted when all `requires` hold. An empty list always matches.
#[derive(Debug, Clone, Copy)]
pub struct PlanRule {
    pub requires: &'static [Requirement],
    pub plan: PlanTemplate,
}

impl PlanRule {
    #[must_use]
    pub fn matches(&self, page: &PredicateText<'_>) -> bool {
        self.requires.iter().all(|r| r.holds(page))
    }
}

#[derive(Debug)]
pub struct SiteCatalog {
    pub key: &'static str,
    pub currency: &'static str,
    pub billing_period: &'static str,
    pub rules: &'static [PlanRule],
    /// Evaluated only when at most one primary rule matched. A fallback plan
    /// is skipped if a plan with the same name was already emitted.
    pub fallback_rules: &'static [PlanRule],
    /// Hand the page to the generic extractor when no rule matched.
    pub defer_when_empty: bool,
}

impl SiteCatalog {
    /// Plans confirmed by `page`, in table order.
    #[must_use]
    pub fn matching_plans(&self, page: &PredicateText<'_>) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(page))
            .map(|rule| rule.plan.to_plan())
            .collect();

        if plans.len() <= 1 {
            for rule in self.fallback_rules {
                if rule.matches(page) && !plans.iter().any(|p| p.name == rule.plan.name) {
                    plans.push(rule.plan.to_plan());
                }
            }
        }

        plans
    }
}

/// Looks up the catalog for a competitor key.
#[must_use]
pub fn find_catalog(key: &str) -> Option<&'static SiteCatalog> {
    SITE_CATALOGS.iter().find(|catalog| catalog.key == key)
}

use Requirement::{AnyOf, Contains, ContainsIgnoreCase};

const MANTLE_STARTER_FEATURES: &[&str] = &["Advanced cap table", "Stakeholder portal", "Reporting"];
const MANTLE_PRO_FEATURES: &[&str] = &[
    "Everything in Starter",
    "Advanced analytics",
    "Priority support",
];

pub static SITE_CATALOGS: &[SiteCatalog] = &[
    SiteCatalog {
        key: "carta",
        currency: "GBP",
        billing_period: "monthly",
        rules: &[
            PlanRule {
                requires: &[Contains("Raise")],
                plan: PlanTemplate {
                    name: "Raise",
                    price: "£21/month",
                    description: "Up to five stakeholders (£250/year)",
                    features: &["Cap table management", "Advance Assurance", "Round modelling"],
                },
            },
            PlanRule {
                requires: &[Contains("Build")],
                plan: PlanTemplate {
                    name: "Build",
                    price: "Contact for pricing",
                    description: "Ideal for early-stage startups",
                    features: &["Everything in Raise", "Round closing", "S/EIS"],
                },
            },
            PlanRule {
                requires: &[Contains("Grow")],
                plan: PlanTemplate {
                    name: "Grow",
                    price: "Contact for pricing",
                    description: "Essentials for growing companies",
                    features: &[
                        "Everything in Build",
                        "EMI & CSOP valuations",
                        "EMI share plans",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Scale")],
                plan: PlanTemplate {
                    name: "Scale",
                    price: "Contact for pricing",
                    description: "Features for scaling businesses",
                    features: &[
                        "Everything in Grow",
                        "409A & growth share valuations",
                        "Compensation management",
                    ],
                },
            },
        ],
        fallback_rules: &[],
        defer_when_empty: false,
    },
    SiteCatalog {
        key: "bolago",
        currency: "SEK",
        billing_period: "annual",
        rules: &[
            PlanRule {
                requires: &[Contains("Gratis")],
                plan: PlanTemplate {
                    name: "Gratis",
                    price: "0 kr",
                    description: "Alltid gratis",
                    features: &[
                        "Aktiebok (till 5 aktieägare)",
                        "Hämtar ärenden från Bolagsverket",
                        "Tillgång till avtalsmallar",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Starter"), Contains("395 kr")],
                plan: PlanTemplate {
                    name: "Starter",
                    price: "329 kr/month",
                    description: "12 månaders bindningstid (3,950 kr/year)",
                    features: &[
                        "Aktiebok (till 15 aktieägare)",
                        "Upp till 2 användare",
                        "Dokumenthantering",
                        "E-Signatur",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Grow"), Contains("1 695 kr")],
                plan: PlanTemplate {
                    name: "Grow",
                    price: "1,413 kr/month",
                    description: "12 månaders bindningstid (16,950 kr/year)",
                    features: &[
                        "Aktiebok (till 25 aktieägare)",
                        "Styrelseportal",
                        "Bolagsstämmor",
                        "Optionsprogram",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Pro")],
                plan: PlanTemplate {
                    name: "Pro",
                    price: "Offert",
                    description: "Alltid 12 månader i taget",
                    features: &[
                        "Obegränsat med användare",
                        "Skräddarsydda upplägg",
                        "Juridiskt konsultstöd",
                    ],
                },
            },
        ],
        fallback_rules: &[],
        defer_when_empty: false,
    },
    SiteCatalog {
        key: "nvr",
        currency: "SEK",
        billing_period: "monthly",
        rules: &[
            PlanRule {
                requires: &[Contains("Basic"), Contains("0 kr/månad")],
                plan: PlanTemplate {
                    name: "Basic",
                    price: "0 kr/månad",
                    description: "För bolag med få aktieägare och förändringar",
                    features: &[
                        "Digital aktiebok",
                        "Aktiebok som PDF",
                        "Investor relations",
                        "Synk med Skatteverket",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Starter"), Contains("49 kr/månad")],
                plan: PlanTemplate {
                    name: "Starter",
                    price: "Från 49 kr/månad",
                    description: "Betala per aktieägare",
                    features: &[
                        "Kategorisering av aktieägare",
                        "Översiktssida med statistik",
                        "Rapporter i PDF och Excel",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Pro"), Contains("750 kr/månad")],
                plan: PlanTemplate {
                    name: "Pro",
                    price: "Från 750 kr/månad",
                    description: "Betala per stakeholder",
                    features: &[
                        "Optioner och derivat",
                        "Avancerade överlåtelser",
                        "Prioriterad support",
                    ],
                },
            },
        ],
        fallback_rules: &[],
        defer_when_empty: false,
    },
    SiteCatalog {
        key: "ledgy",
        currency: "EUR",
        billing_period: "monthly",
        rules: &[
            PlanRule {
                requires: &[Contains("Growth"), Contains("€900/year")],
                plan: PlanTemplate {
                    name: "Growth",
                    price: "€75/month",
                    description: "25 to 50 stakeholders included (€900/year)",
                    features: &[
                        "Cap Table Management",
                        "Document templating",
                        "Employee dashboards",
                        "Custom reporting",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Scale"), Contains("€3k/year")],
                plan: PlanTemplate {
                    name: "Scale",
                    price: "€250/month",
                    description: "50+ stakeholders included (€3k/year)",
                    features: &[
                        "70+ HRIS integrations",
                        "Exit waterfall modeling",
                        "Automated granting",
                        "Onboarding Consultant",
                    ],
                },
            },
            PlanRule {
                requires: &[Contains("Enterprise")],
                plan: PlanTemplate {
                    name: "Enterprise",
                    price: "Custom pricing",
                    description: "200+ stakeholders included",
                    features: &[
                        "GraphQL API access",
                        "SAML SSO",
                        "SCIM provisioning",
                        "IPO preparation",
                    ],
                },
            },
        ],
        fallback_rules: &[],
        defer_when_empty: false,
    },
    // Cake Equity renders its tiers client-side; the catalog is always emitted.
    SiteCatalog {
        key: "cakeequity",
        currency: "USD",
        billing_period: "monthly",
        rules: &[
            PlanRule {
                requires: &[],
                plan: PlanTemplate {
                    name: "Free",
                    price: "Free",
                    description: "5 stakeholders included",
                    features: &[
                        "Cap table management",
                        "Stock options & SAFE notes",
                        "Shareholder access",
                    ],
                },
            },
            PlanRule {
                requires: &[],
                plan: PlanTemplate {
                    name: "Starter",
                    price: "$40/month",
                    description: "30 stakeholders + $3 per additional",
                    features: &[
                        "Cap table management",
                        "Shareholder vesting",
                        "Digital signing",
                        "Scenario modelling",
                    ],
                },
            },
            PlanRule {
                requires: &[],
                plan: PlanTemplate {
                    name: "Growth",
                    price: "$80/month",
                    description: "30 stakeholders + $5 per additional",
                    features: &[
                        "All Starter features",
                        "Stock Options & RSUs",
                        "Legal templates",
                        "Team equity benchmarks",
                    ],
                },
            },
            PlanRule {
                requires: &[],
                plan: PlanTemplate {
                    name: "Pro",
                    price: "Custom pricing",
                    description: "Large cap tables with discounted rates",
                    features: &[
                        "409A Valuation",
                        "IFRS 2 compliance",
                        "International options",
                        "Priority support",
                    ],
                },
            },
        ],
        fallback_rules: &[],
        defer_when_empty: false,
    },
    // Mantle advertises yearly totals; the monthly amounts are the fallback.
    SiteCatalog {
        key: "mantle",
        currency: "USD",
        billing_period: "monthly",
        rules: &[
            PlanRule {
                requires: &[ContainsIgnoreCase("free")],
                plan: PlanTemplate {
                    name: "Free",
                    price: "Free",
                    description: "Basic equity management",
                    features: &["Cap table management", "Basic reporting"],
                },
            },
            PlanRule {
                requires: &[AnyOf(&["1200", "$1,200"])],
                plan: PlanTemplate {
                    name: "Starter",
                    price: "$100/month",
                    description: "Growing companies ($1,200/year)",
                    features: MANTLE_STARTER_FEATURES,
                },
            },
            PlanRule {
                requires: &[AnyOf(&["3000", "$3,000"])],
                plan: PlanTemplate {
                    name: "Pro",
                    price: "$250/month",
                    description: "Scaling companies ($3,000/year)",
                    features: MANTLE_PRO_FEATURES,
                },
            },
        ],
        fallback_rules: &[
            PlanRule {
                requires: &[Contains("$100")],
                plan: PlanTemplate {
                    name: "Starter",
                    price: "$100/month",
                    description: "Growing companies",
                    features: MANTLE_STARTER_FEATURES,
                },
            },
            PlanRule {
                requires: &[Contains("$250")],
                plan: PlanTemplate {
                    name: "Pro",
                    price: "$250/month",
                    description: "Scaling companies",
                    features: MANTLE_PRO_FEATURES,
                },
            },
        ],
        defer_when_empty: true,
    },
];
