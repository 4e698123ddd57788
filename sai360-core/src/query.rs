//! Table-record query parameters for the XML instance endpoints.

use chrono::NaiveDate;

/// How references to other records are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefMode {
    #[default]
    Guid,
    Label,
}

impl RefMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RefMode::Guid => "guid",
            RefMode::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xml,
    Zip,
}

impl ExportFormat {
    pub fn accept(self) -> &'static str {
        match self {
            ExportFormat::Xml => "application/xml",
            ExportFormat::Zip => "application/zip",
        }
    }
}

/// What to do with the records a stored query selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryAction {
    #[default]
    Fetch,
    Delete,
}

/// Selection of records of one class.
///
/// `query` and `follow_references` are bare expressions; they are sent wrapped
/// as `Class[expr]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceQuery {
    pub class_name: String,
    pub query: Option<String>,
    pub ref_mode: RefMode,
    pub sub_types: bool,
    pub follow_references: Option<String>,
    pub meta_info: bool,
    pub workflow: bool,
    pub published_since: Option<NaiveDate>,
}

impl InstanceQuery {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            query: None,
            ref_mode: RefMode::default(),
            sub_types: false,
            follow_references: None,
            meta_info: false,
            workflow: false,
            published_since: None,
        }
    }

    pub fn query(mut self, expr: impl Into<String>) -> Self {
        self.query = Some(expr.into());
        self
    }

    pub fn ref_mode(mut self, mode: RefMode) -> Self {
        self.ref_mode = mode;
        self
    }

    pub fn sub_types(mut self, on: bool) -> Self {
        self.sub_types = on;
        self
    }

    pub fn follow_references(mut self, expr: impl Into<String>) -> Self {
        self.follow_references = Some(expr.into());
        self
    }

    pub fn meta_info(mut self, on: bool) -> Self {
        self.meta_info = on;
        self
    }

    pub fn workflow(mut self, on: bool) -> Self {
        self.workflow = on;
        self
    }

    pub fn published_since(mut self, date: NaiveDate) -> Self {
        self.published_since = Some(date);
        self
    }

    fn wrap(&self, expr: Option<&str>) -> Option<String> {
        expr.filter(|e| !e.is_empty())
            .map(|e| format!("{}[{e}]", self.class_name))
    }

    /// Query string of `GET /api/instances/`.
    pub fn export_params(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("class".to_string(), self.class_name.clone()),
            ("refMode".to_string(), self.ref_mode.as_str().to_string()),
        ];
        if let Some(q) = self.wrap(self.query.as_deref()) {
            out.push(("query".to_string(), q));
        }
        if self.sub_types {
            out.push(("subTypes".to_string(), "true".to_string()));
        }
        out.extend(self.result_params());
        if let Some(date) = self.published_since {
            out.push((
                "publishedSince".to_string(),
                date.format("%Y%m%d").to_string(),
            ));
        }
        out
    }

    /// Form body of `POST /api/instances/query`.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("class".to_string(), self.class_name.clone()),
            ("refMode".to_string(), self.ref_mode.as_str().to_string()),
        ];
        if let Some(q) = self.wrap(self.query.as_deref()) {
            out.push(("query".to_string(), q));
        }
        out.push(("subTypes".to_string(), self.sub_types.to_string()));
        if let Some(f) = self.wrap(self.follow_references.as_deref()) {
            out.push(("followReferences".to_string(), f));
        }
        out
    }

    /// Query string when fetching the records of a stored query.
    pub fn result_params(&self) -> Vec<(String, String)> {
        [("metaInfo", self.meta_info), ("workflow", self.workflow)]
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| (name.to_string(), "true".to_string()))
            .collect()
    }
}
