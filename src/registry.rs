//! Module registry: endpoint groups and the resource clients they expose.
//!
//! Every resource client the crate knows about is listed exactly once in
//! [`ResourceKind`]. Each entry names its endpoint group, its path template,
//! the JSON roots used to unwrap responses, and the type that implements it.
//! The table is `'static`; nothing mutates it after compilation.

use std::fmt;
use std::str::FromStr;

use crate::error::ZendeskError;

/// Host suffix appended to the account subdomain.
pub const ZENDESK_HOST_SUFFIX: &str = ".zendesk.com";

/// A named partition of the Zendesk API, each with its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointGroup {
    /// Ticketing core (`/api/v2`).
    Core,
    /// Help Center / Guide (`/api/v2/help_center`).
    HelpCenter,
    /// Net Promoter Score surveys. Has no default base URL.
    Nps,
    /// Jira integration services (`/api/services/jira`).
    Services,
    /// Talk / voice channel (`/api/v2/channels/voice`).
    Voice,
}

impl EndpointGroup {
    /// Every endpoint group, in registry order.
    pub const ALL: [EndpointGroup; 5] = [
        EndpointGroup::Core,
        EndpointGroup::HelpCenter,
        EndpointGroup::Nps,
        EndpointGroup::Services,
        EndpointGroup::Voice,
    ];

    /// The registry key of this group.
    pub fn key(self) -> &'static str {
        match self {
            EndpointGroup::Core => "core",
            EndpointGroup::HelpCenter => "helpcenter",
            EndpointGroup::Nps => "nps",
            EndpointGroup::Services => "services",
            EndpointGroup::Voice => "voice",
        }
    }

    /// Path appended to `https://{subdomain}.zendesk.com`, if the group has one.
    ///
    /// NPS is registered without an endpoint; clients for it need an explicit
    /// endpoint URI in the configuration.
    pub fn base_path(self) -> Option<&'static str> {
        match self {
            EndpointGroup::Core => Some("/api/v2"),
            EndpointGroup::HelpCenter => Some("/api/v2/help_center"),
            EndpointGroup::Nps => None,
            EndpointGroup::Services => Some("/api/services/jira"),
            EndpointGroup::Voice => Some("/api/v2/channels/voice"),
        }
    }

    /// Builds the default base URL for an account subdomain.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` when the group has no default endpoint.
    pub fn base_url(self, subdomain: &str) -> Result<String, ZendeskError> {
        let path = self.base_path().ok_or_else(|| {
            ZendeskError::invalid_config(format!(
                "endpoint group '{}' has no default endpoint; set ZENDESK_ENDPOINT_URI",
                self.key()
            ))
        })?;
        Ok(format!("https://{}{}{}", subdomain, ZENDESK_HOST_SUFFIX, path))
    }

    /// Iterates over the resource kinds registered in this group.
    pub fn resources(self) -> impl Iterator<Item = ResourceKind> {
        ResourceKind::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.group() == self)
    }

    /// Looks up a resource client by its registry name within this group.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if no resource of that name exists here.
    pub fn lookup(self, name: &str) -> Result<ResourceKind, ZendeskError> {
        self.resources()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                ZendeskError::invalid_config(format!(
                    "unknown resource client '{}' in endpoint group '{}'",
                    name,
                    self.key()
                ))
            })
    }
}

impl fmt::Display for EndpointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EndpointGroup {
    type Err = ZendeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        EndpointGroup::ALL
            .into_iter()
            .find(|group| group.key() == key)
            .ok_or_else(|| {
                ZendeskError::invalid_config(format!("unknown endpoint group '{}'", s.trim()))
            })
    }
}

/// The concrete client type that serves a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    /// [`Views`](crate::resources::Views), with view-specific actions.
    Views,
    /// [`Resource`](crate::resources::Resource), plain CRUD over the path template.
    Generic,
}

/// Static description of one resource client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Registry name, unique within the group.
    pub name: &'static str,
    /// Group whose base URL the paths are relative to.
    pub group: EndpointGroup,
    /// Path template. `{parent}` marks a parent identifier bound at call time.
    pub path: &'static str,
    /// Response keys holding the payload: plural first, then singular.
    pub json_roots: &'static [&'static str],
    /// Type implementing the client.
    pub client_type: ClientType,
}

impl ResourceDescriptor {
    /// Returns true when the path template needs a parent identifier.
    pub fn is_nested(&self) -> bool {
        self.path.contains(PARENT_PLACEHOLDER)
    }
}

/// Placeholder for a parent identifier inside a path template.
pub const PARENT_PLACEHOLDER: &str = "{parent}";

macro_rules! registry {
    ($($kind:ident => $group:ident, $name:literal, $path:literal, [$($root:literal),*], $client:ident;)+) => {
        /// Every resource client in the registry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResourceKind {
            $(
                #[doc = concat!("`", $name, "` (", stringify!($group), "): `", $path, "`")]
                $kind,
            )+
        }

        impl ResourceKind {
            /// Every registry entry, grouped by endpoint group.
            pub const ALL: &'static [ResourceKind] = &[$(ResourceKind::$kind),+];

            /// The static descriptor of this entry.
            pub fn descriptor(self) -> &'static ResourceDescriptor {
                match self {
                    $(
                        ResourceKind::$kind => &ResourceDescriptor {
                            name: $name,
                            group: EndpointGroup::$group,
                            path: $path,
                            json_roots: &[$($root),*],
                            client_type: ClientType::$client,
                        },
                    )+
                }
            }
        }
    };
}

registry! {
    AccountSettings => Core, "AccountSettings", "account/settings", ["settings"], Generic;
    ActivityStream => Core, "ActivityStream", "activities", ["activities", "activity"], Generic;
    Attachments => Core, "Attachments", "attachments", ["attachments", "attachment"], Generic;
    Automations => Core, "Automations", "automations", ["automations", "automation"], Generic;
    Brand => Core, "Brand", "brands", ["brands", "brand"], Generic;
    CustomAgentRoles => Core, "CustomAgentRoles", "custom_roles", ["custom_roles", "custom_role"], Generic;
    DynamicContent => Core, "DynamicContent", "dynamic_content/items", ["items", "item"], Generic;
    DynamicContentVariants => Core, "DynamicContentVariants", "dynamic_content/items/{parent}/variants", ["variants", "variant"], Generic;
    GroupMemberships => Core, "GroupMemberships", "group_memberships", ["group_memberships", "group_membership"], Generic;
    Groups => Core, "Groups", "groups", ["groups", "group"], Generic;
    Imports => Core, "Imports", "imports/tickets", ["tickets", "ticket"], Generic;
    Installations => Core, "Installations", "apps/installations", ["installations", "installation"], Generic;
    JobStatuses => Core, "JobStatuses", "job_statuses", ["job_statuses", "job_status"], Generic;
    Locales => Core, "Locales", "locales", ["locales", "locale"], Generic;
    Macros => Core, "Macros", "macros", ["macros", "macro"], Generic;
    OauthTokens => Core, "OauthTokens", "oauth/tokens", ["tokens", "token"], Generic;
    OrganizationFields => Core, "OrganizationFields", "organization_fields", ["organization_fields", "organization_field"], Generic;
    OrganizationMemberships => Core, "OrganizationMemberships", "organization_memberships", ["organization_memberships", "organization_membership"], Generic;
    Organizations => Core, "Organizations", "organizations", ["organizations", "organization"], Generic;
    PermissionGroups => Core, "PermissionGroups", "guide/permission_groups", ["permission_groups", "permission_group"], Generic;
    Policies => Core, "Policies", "slas/policies", ["sla_policies", "sla_policy"], Generic;
    Requests => Core, "Requests", "requests", ["requests", "request"], Generic;
    SatisfactionRatings => Core, "SatisfactionRatings", "satisfaction_ratings", ["satisfaction_ratings", "satisfaction_rating"], Generic;
    Search => Core, "Search", "search", ["results"], Generic;
    Sessions => Core, "Sessions", "sessions", ["sessions", "session"], Generic;
    SharingAgreement => Core, "SharingAgreement", "sharing_agreements", ["sharing_agreements", "sharing_agreement"], Generic;
    SuspendedTickets => Core, "SuspendedTickets", "suspended_tickets", ["suspended_tickets", "suspended_ticket"], Generic;
    Tags => Core, "Tags", "tags", ["tags"], Generic;
    Targets => Core, "Targets", "targets", ["targets", "target"], Generic;
    TicketAudits => Core, "TicketAudits", "tickets/{parent}/audits", ["audits", "audit"], Generic;
    TicketEvents => Core, "TicketEvents", "incremental/ticket_events", ["ticket_events"], Generic;
    TicketExport => Core, "TicketExport", "incremental/tickets", ["tickets"], Generic;
    TicketFields => Core, "TicketFields", "ticket_fields", ["ticket_fields", "ticket_field"], Generic;
    TicketForms => Core, "TicketForms", "ticket_forms", ["ticket_forms", "ticket_form"], Generic;
    TicketImport => Core, "TicketImport", "imports/tickets", ["tickets", "ticket"], Generic;
    TicketMetrics => Core, "TicketMetrics", "ticket_metrics", ["ticket_metrics", "ticket_metric"], Generic;
    Tickets => Core, "Tickets", "tickets", ["tickets", "ticket"], Generic;
    Triggers => Core, "Triggers", "triggers", ["triggers", "trigger"], Generic;
    UserFields => Core, "UserFields", "user_fields", ["user_fields", "user_field"], Generic;
    UserIdentities => Core, "UserIdentities", "users/{parent}/identities", ["identities", "identity"], Generic;
    Users => Core, "Users", "users", ["users", "user"], Generic;
    Views => Core, "Views", "views", ["views", "view"], Views;
    Webhooks => Core, "Webhooks", "webhooks", ["webhooks", "webhook"], Generic;

    AccessPolicies => HelpCenter, "AccessPolicies", "sections/{parent}/access_policy", ["access_policy"], Generic;
    ArticleAttachments => HelpCenter, "ArticleAttachments", "articles/{parent}/attachments", ["article_attachments", "article_attachment"], Generic;
    ArticleComments => HelpCenter, "ArticleComments", "articles/{parent}/comments", ["comments", "comment"], Generic;
    ArticleLabels => HelpCenter, "ArticleLabels", "articles/labels", ["labels", "label"], Generic;
    Articles => HelpCenter, "Articles", "articles", ["articles", "article"], Generic;
    Categories => HelpCenter, "Categories", "categories", ["categories", "category"], Generic;
    HelpCenterSearch => HelpCenter, "Search", "articles/search", ["results"], Generic;
    Sections => HelpCenter, "Sections", "sections", ["sections", "section"], Generic;
    Subscriptions => HelpCenter, "Subscriptions", "articles/{parent}/subscriptions", ["subscriptions", "subscription"], Generic;
    Translations => HelpCenter, "Translations", "articles/{parent}/translations", ["translations", "translation"], Generic;
    UserSegments => HelpCenter, "UserSegments", "user_segments", ["user_segments", "user_segment"], Generic;
    Votes => HelpCenter, "Votes", "articles/{parent}/votes", ["votes", "vote"], Generic;

    Invitations => Nps, "Invitations", "surveys/{parent}/invitations", ["invitations", "invitation"], Generic;
    Surveys => Nps, "Surveys", "surveys", ["surveys", "survey"], Generic;

    Links => Services, "Links", "links", ["links", "link"], Generic;

    AgentActivity => Voice, "AgentActivity", "stats/agents_activity", ["agents_activity"], Generic;
    Availabilities => Voice, "Availabilities", "availabilities", ["availabilities", "availability"], Generic;
    CurrentQueueActivity => Voice, "CurrentQueueActivity", "stats/current_queue_activity", ["current_queue_activity"], Generic;
    GreetingCategories => Voice, "GreetingCategories", "greeting_categories", ["greeting_categories", "greeting_category"], Generic;
    Greetings => Voice, "Greetings", "greetings", ["greetings", "greeting"], Generic;
    HistoricalQueueActivity => Voice, "HistoricalQueueActivity", "stats/historical_queue_activity", ["historical_queue_activity"], Generic;
    PhoneNumbers => Voice, "PhoneNumbers", "phone_numbers", ["phone_numbers", "phone_number"], Generic;
}

impl ResourceKind {
    /// Registry name of this entry.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Endpoint group this entry belongs to.
    pub fn group(self) -> EndpointGroup {
        self.descriptor().group
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_group_parses_from_key() {
        assert_eq!("core".parse::<EndpointGroup>().unwrap(), EndpointGroup::Core);
        assert_eq!(
            " HelpCenter ".parse::<EndpointGroup>().unwrap(),
            EndpointGroup::HelpCenter
        );
    }

    #[test]
    fn test_unknown_group_is_config_error() {
        let err = "billing".parse::<EndpointGroup>().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("billing"));
    }

    #[test]
    fn test_names_unique_within_group() {
        for group in EndpointGroup::ALL {
            let mut seen = HashSet::new();
            for kind in group.resources() {
                assert!(seen.insert(kind.name()), "duplicate {} in {}", kind.name(), group);
            }
        }
    }

    #[test]
    fn test_every_group_has_resources() {
        for group in EndpointGroup::ALL {
            assert!(group.resources().next().is_some(), "{} is empty", group);
        }
    }

    #[test]
    fn test_search_resolves_per_group() {
        assert_eq!(
            EndpointGroup::Core.lookup("Search").unwrap(),
            ResourceKind::Search
        );
        assert_eq!(
            EndpointGroup::HelpCenter.lookup("Search").unwrap(),
            ResourceKind::HelpCenterSearch
        );
    }

    #[test]
    fn test_lookup_unknown_name_fails() {
        let err = EndpointGroup::Voice.lookup("Views").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Views"));
        assert!(err.to_string().contains("voice"));
    }

    #[test]
    fn test_views_descriptor() {
        let desc = ResourceKind::Views.descriptor();
        assert_eq!(desc.path, "views");
        assert_eq!(desc.json_roots, &["views", "view"]);
        assert_eq!(desc.client_type, ClientType::Views);
        assert!(!desc.is_nested());
    }

    #[test]
    fn test_only_views_uses_views_client() {
        let typed: Vec<_> = ResourceKind::ALL
            .iter()
            .filter(|kind| kind.descriptor().client_type == ClientType::Views)
            .collect();
        assert_eq!(typed, vec![&ResourceKind::Views]);
    }

    #[test]
    fn test_nested_templates() {
        assert!(ResourceKind::TicketAudits.descriptor().is_nested());
        assert!(ResourceKind::Votes.descriptor().is_nested());
        assert!(!ResourceKind::Tickets.descriptor().is_nested());
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            EndpointGroup::Core.base_url("acme").unwrap(),
            "https://acme.zendesk.com/api/v2"
        );
        assert_eq!(
            EndpointGroup::Voice.base_url("acme").unwrap(),
            "https://acme.zendesk.com/api/v2/channels/voice"
        );
        assert!(EndpointGroup::Nps.base_url("acme").unwrap_err().is_config());
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceKind::HelpCenterSearch.to_string(), "helpcenter.Search");
        assert_eq!(EndpointGroup::Services.to_string(), "services");
    }
}
