//! # Route Resolver
//!
//! Maps an inbound verb + path to a fully qualified action name and one merged
//! parameter bag. Mounting a [`ResourceService`] registers every action that
//! declares a REST alias under `<prefix>/<service name>`.
//!
//! Parameter precedence, lowest to highest: query string, JSON body, path
//! segments. Path bindings win because they name the addressed resource.
//!
//! Each path segment is percent-decoded after splitting, so `%2F` inside an id
//! never acts as a separator.

use crate::action::Method;
use crate::error::FrameworkError;
use crate::params::Params;
use crate::service::ResourceService;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path such as `/api/addresses/user/:userId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(path: &str) -> Self {
        let segments = split(path)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Binds `:name` segments positionally, or `None` if the path does not fit.
    fn bind<S: AsRef<str>>(&self, path: &[S]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut bound = Params::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            let actual = actual.as_ref();
            match segment {
                Segment::Literal(expected) if expected == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    bound.insert(name.clone(), Value::String(actual.to_string()));
                }
            }
        }
        Some(bound)
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn decode(segment: &str) -> Result<Cow<'_, str>, FrameworkError> {
    urlencoding::decode(segment).map_err(|_| {
        FrameworkError::BadRequest(format!("path segment is not valid UTF-8: {segment}"))
    })
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    template: PathTemplate,
    action: String,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub action: String,
    pub params: Params,
}

/// Alias table from verb + path template to action name.
#[derive(Debug, Clone)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates an empty table whose routes live under `prefix` (e.g. `/api`).
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            routes: Vec::new(),
        }
    }

    /// Registers every aliased action of `service` under `<prefix>/<service>`.
    ///
    /// Alias paths are relative to the service, with or without a leading `/`.
    pub fn mount(&mut self, service: &ResourceService) {
        for def in service.actions() {
            if let Some(alias) = def.rest_alias() {
                let path = format!("/{}/{}", service.name(), alias.path.trim_start_matches('/'));
                self.add(alias.method, &path, format!("{}.{}", service.name(), def.name()));
            }
        }
    }

    /// Registers one alias; `path` is relative to the prefix.
    pub fn add(&mut self, method: Method, path: &str, action: impl Into<String>) {
        let full = format!("{}/{}", self.prefix, path.trim_start_matches('/'));
        let action = action.into();
        debug!(%method, path = %full, %action, "Route added");
        self.routes.push(Route {
            method,
            template: PathTemplate::parse(&full),
            action,
        });
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolves a request to an action and a merged parameter bag.
    ///
    /// When several templates fit, the one with the most literal segments wins;
    /// ties go to the route registered first. A segment that does not decode to
    /// UTF-8 is a [`FrameworkError::BadRequest`].
    pub fn resolve(
        &self,
        method: Method,
        path: &str,
        query: Params,
        body: Params,
    ) -> Result<Resolution, FrameworkError> {
        let actual = split(path).map(decode).collect::<Result<Vec<_>, _>>()?;

        let mut best: Option<(&Route, Params)> = None;
        for route in self.routes.iter().filter(|r| r.method == method) {
            if let Some(bound) = route.template.bind(&actual) {
                let better = match &best {
                    Some((current, _)) => {
                        route.template.literal_count() > current.template.literal_count()
                    }
                    None => true,
                };
                if better {
                    best = Some((route, bound));
                }
            }
        }

        let (route, path_params) = best.ok_or_else(|| FrameworkError::NoRoute {
            method: method.to_string(),
            path: path.to_string(),
        })?;

        let mut params = query;
        params.extend(body);
        params.extend(path_params);
        Ok(Resolution {
            action: route.action.clone(),
            params,
        })
    }
}
