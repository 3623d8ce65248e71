use strum_macros::Display;

/// Parameters of one navigation event. `/list/:category` routes carry a
/// category name, `/list/genre/:id` routes carry a genre identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParams {
    pub category: Option<String>,
    pub id: Option<String>,
}

impl RouteParams {
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            id: None,
        }
    }

    pub fn genre(id: impl Into<String>) -> Self {
        Self {
            category: None,
            id: Some(id.into()),
        }
    }
}

/// Which remote list a descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum QueryMode {
    Category,
    Genre,
}

/// Identifies the remote list being browsed. Equality is structural; the
/// controller compares descriptors to tell a genuine navigation from a
/// repeat of the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub mode: QueryMode,
    pub key: String,
}

impl QueryDescriptor {
    pub fn category(key: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Category,
            key: key.into(),
        }
    }

    pub fn genre(key: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Genre,
            key: key.into(),
        }
    }

    /// Map route parameters to a descriptor. Presence of `category` selects
    /// category mode; otherwise the genre id is used, falling back to an
    /// empty key when both are absent. Total on purpose: malformed input
    /// yields a descriptor whose fetch fails at the transport, never a
    /// resolver error.
    pub fn resolve(params: &RouteParams) -> Self {
        match (&params.category, &params.id) {
            (Some(category), _) => Self::category(category.clone()),
            (None, Some(id)) => Self::genre(id.clone()),
            (None, None) => Self::genre(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_param_selects_category_mode() {
        let descriptor = QueryDescriptor::resolve(&RouteParams::category("popular"));
        assert_eq!(descriptor, QueryDescriptor::category("popular"));
    }

    #[test]
    fn test_genre_param_selects_genre_mode() {
        let descriptor = QueryDescriptor::resolve(&RouteParams::genre("28"));
        assert_eq!(descriptor, QueryDescriptor::genre("28"));
    }

    #[test]
    fn test_category_wins_when_both_present() {
        let params = RouteParams {
            category: Some("upcoming".to_string()),
            id: Some("12".to_string()),
        };
        assert_eq!(
            QueryDescriptor::resolve(&params),
            QueryDescriptor::category("upcoming")
        );
    }

    #[test]
    fn test_empty_params_resolve_to_empty_genre_key() {
        // The fetch for this descriptor will fail remotely; the resolver
        // itself never does.
        let descriptor = QueryDescriptor::resolve(&RouteParams::default());
        assert_eq!(descriptor, QueryDescriptor::genre(""));
    }

    #[test]
    fn test_mode_display_is_lowercase() {
        assert_eq!(QueryMode::Category.to_string(), "category");
        assert_eq!(QueryMode::Genre.to_string(), "genre");
    }
}
