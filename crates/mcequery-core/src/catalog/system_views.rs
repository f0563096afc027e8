//! Platform system data views and their columns.

use crate::types::{Field, FieldType};

use FieldType::{Boolean as B, Date as D, EmailAddress as E, Integer as N, Locale as L, Text as T};

type Column = (&'static str, FieldType, Option<u32>);

const SENT: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("Domain", T, Some(128)),
    ("TriggererSendDefinitionObjectID", T, Some(36)),
    ("TriggeredSendCustomerKey", T, Some(36)),
];

const OPEN: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("Domain", T, Some(128)),
    ("IsUnique", B, None),
    ("TriggererSendDefinitionObjectID", T, Some(36)),
    ("TriggeredSendCustomerKey", T, Some(36)),
];

const CLICK: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("Domain", T, Some(128)),
    ("URL", T, Some(900)),
    ("LinkName", T, Some(1024)),
    ("LinkContent", T, Some(4000)),
    ("IsUnique", B, None),
    ("TriggererSendDefinitionObjectID", T, Some(36)),
    ("TriggeredSendCustomerKey", T, Some(36)),
];

const BOUNCE: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("IsUnique", B, None),
    ("Domain", T, Some(128)),
    ("BounceCategoryID", N, None),
    ("BounceCategory", T, Some(50)),
    ("BounceSubcategoryID", N, None),
    ("BounceSubcategory", T, Some(50)),
    ("BounceTypeID", N, None),
    ("BounceType", T, Some(50)),
    ("SMTPBounceReason", T, Some(4000)),
    ("SMTPMessage", T, Some(4000)),
    ("SMTPCode", N, None),
    ("TriggererSendDefinitionObjectID", T, Some(36)),
    ("TriggeredSendCustomerKey", T, Some(36)),
];

const UNSUBSCRIBE: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("IsUnique", B, None),
    ("Domain", T, Some(128)),
];

const COMPLAINT: &[Column] = &[
    ("AccountID", N, None),
    ("OYBAccountID", N, None),
    ("JobID", N, None),
    ("ListID", N, None),
    ("BatchID", N, None),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("EventDate", D, None),
    ("IsUnique", B, None),
    ("Domain", T, Some(128)),
];

const JOB: &[Column] = &[
    ("JobID", N, None),
    ("EmailID", N, None),
    ("AccountID", N, None),
    ("AccountUserID", N, None),
    ("FromName", T, Some(130)),
    ("FromEmail", E, Some(100)),
    ("SchedTime", D, None),
    ("PickupTime", D, None),
    ("DeliveredTime", D, None),
    ("EventID", T, Some(50)),
    ("IsMultipart", B, None),
    ("JobType", T, Some(50)),
    ("JobStatus", T, Some(50)),
    ("ModifiedBy", N, None),
    ("ModifiedDate", D, None),
    ("EmailName", T, Some(100)),
    ("EmailSubject", T, Some(200)),
    ("IsWrapped", B, None),
    ("TestEmailAddr", E, Some(128)),
    ("Category", T, Some(100)),
    ("BccEmail", E, Some(100)),
    ("OriginalSchedTime", D, None),
    ("CreatedDate", D, None),
    ("CharacterSet", T, Some(30)),
    ("IPAddress", T, Some(50)),
    ("SendType", T, Some(128)),
    ("DynamicEmailSubject", T, Some(4000)),
    ("SuppressTracking", B, None),
    ("SendClassificationType", T, Some(32)),
    ("SendClassification", T, Some(36)),
    ("DeduplicateByEmail", B, None),
    ("TriggererSendDefinitionObjectID", T, Some(36)),
    ("TriggeredSendCustomerKey", T, Some(36)),
];

const SUBSCRIBERS: &[Column] = &[
    ("SubscriberID", N, None),
    ("DateUndeliverable", D, None),
    ("DateJoined", D, None),
    ("DateUnsubscribed", D, None),
    ("Domain", T, Some(254)),
    ("EmailAddress", E, Some(254)),
    ("BounceCount", N, None),
    ("SubscriberKey", T, Some(254)),
    ("SubscriberType", T, Some(100)),
    ("Status", T, Some(12)),
    ("Locale", L, None),
];

const LIST_SUBSCRIBERS: &[Column] = &[
    ("AddedBy", N, None),
    ("AddMethod", T, Some(17)),
    ("CreatedDate", D, None),
    ("DateUnsubscribed", D, None),
    ("EmailAddress", E, Some(254)),
    ("ListID", N, None),
    ("ListName", T, Some(50)),
    ("ListType", T, Some(16)),
    ("Status", T, Some(12)),
    ("SubscriberID", N, None),
    ("SubscriberKey", T, Some(254)),
    ("SubscriberType", T, Some(100)),
];

const JOURNEY: &[Column] = &[
    ("VersionID", T, Some(36)),
    ("JourneyID", T, Some(36)),
    ("JourneyName", T, Some(200)),
    ("VersionNumber", N, None),
    ("CreatedDate", D, None),
    ("LastPublishedDate", D, None),
    ("ModifiedDate", D, None),
    ("JourneyStatus", T, Some(100)),
];

const JOURNEY_ACTIVITY: &[Column] = &[
    ("VersionID", T, Some(36)),
    ("ActivityID", T, Some(36)),
    ("ActivityName", T, Some(200)),
    ("ActivityExternalKey", T, Some(200)),
    ("JourneyActivityObjectID", T, Some(36)),
    ("ActivityType", T, Some(512)),
];

/// Every system data view, in the order they are offered for completion.
pub const SYSTEM_VIEWS: &[(&str, &[Column])] = &[
    ("_Sent", SENT),
    ("_Open", OPEN),
    ("_Click", CLICK),
    ("_Bounce", BOUNCE),
    ("_Unsubscribe", UNSUBSCRIBE),
    ("_Complaint", COMPLAINT),
    ("_Job", JOB),
    ("_Subscribers", SUBSCRIBERS),
    ("_ListSubscribers", LIST_SUBSCRIBERS),
    ("_Journey", JOURNEY),
    ("_JourneyActivity", JOURNEY_ACTIVITY),
];

/// Canonical name of a system view, matched case-insensitively.
///
/// The `ENT.` qualifier is accepted since system views can be read from the
/// parent business unit too.
pub fn system_view_name(name: &str) -> Option<&'static str> {
    let bare = strip_ent_prefix(name);
    SYSTEM_VIEWS
        .iter()
        .find(|(view, _)| view.eq_ignore_ascii_case(bare))
        .map(|(view, _)| *view)
}

pub fn is_system_view(name: &str) -> bool {
    system_view_name(name).is_some()
}

/// Declared fields of a system view.
pub fn system_view_fields(name: &str) -> Option<Vec<Field>> {
    let bare = strip_ent_prefix(name);
    SYSTEM_VIEWS
        .iter()
        .find(|(view, _)| view.eq_ignore_ascii_case(bare))
        .map(|(_, columns)| {
            columns
                .iter()
                .map(|(column, field_type, length)| Field {
                    name: (*column).to_string(),
                    field_type: *field_type,
                    length: *length,
                })
                .collect()
        })
}

pub(crate) fn strip_ent_prefix(name: &str) -> &str {
    let trimmed = name.trim();
    match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ENT.") => &trimmed[4..],
        _ => trimmed,
    }
}
