// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Listers for `MySQLBackupSchedule`
//!
//! Reads go straight to the shared indexed cache; nothing here mutates it.

use std::sync::Arc;

use super::expansion::{
    MySQLBackupScheduleListerExpansion, MySQLBackupScheduleNamespaceListerExpansion,
};
use crate::apis::cr::v1::{self, MySQLBackupSchedule};
use crate::cache::{self, Indexer};
use crate::errors::ListerError;
use crate::labels::Selector;

/// Resource name used in not-found errors
const RESOURCE: &str = "mysqlbackupschedule";

/// Lists `MySQLBackupSchedule`s across namespaces
pub trait MySQLBackupScheduleLister: MySQLBackupScheduleListerExpansion {
    type NamespaceLister: MySQLBackupScheduleNamespaceLister;

    /// All schedules in the cache matching `selector`
    fn list(&self, selector: &Selector) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError>;

    /// A lister bound to one namespace
    fn for_namespace(&self, namespace: &str) -> Self::NamespaceLister;
}

/// Lists and gets `MySQLBackupSchedule`s in one namespace
pub trait MySQLBackupScheduleNamespaceLister: MySQLBackupScheduleNamespaceListerExpansion {
    /// Schedules in this namespace matching `selector`
    fn list(&self, selector: &Selector) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError>;

    /// The schedule named `name` in this namespace
    fn get(&self, name: &str) -> Result<Arc<MySQLBackupSchedule>, ListerError>;
}

/// [`MySQLBackupScheduleLister`] over an indexed cache
#[derive(Clone)]
pub struct ScheduleLister {
    indexer: Arc<dyn Indexer<MySQLBackupSchedule>>,
}

impl ScheduleLister {
    pub fn new(indexer: Arc<dyn Indexer<MySQLBackupSchedule>>) -> Self {
        Self { indexer }
    }
}

impl MySQLBackupScheduleLister for ScheduleLister {
    type NamespaceLister = NamespacedScheduleLister;

    fn list(&self, selector: &Selector) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError> {
        let mut ret = Vec::new();
        cache::list_all(&*self.indexer, selector, |m| ret.push(m))?;
        Ok(ret)
    }

    fn for_namespace(&self, namespace: &str) -> NamespacedScheduleLister {
        NamespacedScheduleLister {
            indexer: Arc::clone(&self.indexer),
            namespace: namespace.to_string(),
        }
    }
}

impl MySQLBackupScheduleListerExpansion for ScheduleLister {
    fn list_for_cluster(&self, cluster: &str) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError> {
        let mut schedules = self.list(&Selector::everything())?;
        schedules.retain(|s| s.spec.cluster == cluster);
        Ok(schedules)
    }
}

/// [`MySQLBackupScheduleNamespaceLister`] over an indexed cache
#[derive(Clone)]
pub struct NamespacedScheduleLister {
    indexer: Arc<dyn Indexer<MySQLBackupSchedule>>,
    namespace: String,
}

impl NamespacedScheduleLister {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl MySQLBackupScheduleNamespaceLister for NamespacedScheduleLister {
    fn list(&self, selector: &Selector) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError> {
        let mut ret = Vec::new();
        cache::list_all_by_namespace(&*self.indexer, &self.namespace, selector, |m| {
            ret.push(m)
        })?;
        Ok(ret)
    }

    fn get(&self, name: &str) -> Result<Arc<MySQLBackupSchedule>, ListerError> {
        let key = format!("{}/{}", self.namespace, name);
        self.indexer
            .get_by_key(&key)?
            .ok_or_else(|| ListerError::not_found(v1::resource(RESOURCE), name))
    }
}

impl MySQLBackupScheduleNamespaceListerExpansion for NamespacedScheduleLister {
    fn list_for_cluster(&self, cluster: &str) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError> {
        let mut schedules = self.list(&Selector::everything())?;
        schedules.retain(|s| s.spec.cluster == cluster);
        Ok(schedules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::cr::v1::MySQLBackupScheduleSpec;
    use crate::cache::store_with;
    use crate::errors::CacheError;
    use kube::runtime::reflector::store::Writer;
    use kube::runtime::watcher::Event;
    use std::collections::BTreeMap;

    fn schedule(ns: &str, name: &str, cluster: &str, labels: &[(&str, &str)]) -> MySQLBackupSchedule {
        let mut obj = MySQLBackupSchedule::new(
            name,
            MySQLBackupScheduleSpec {
                cluster: cluster.to_string(),
                time: "0 3 * * *".to_string(),
            },
        );
        obj.metadata.namespace = Some(ns.to_string());
        if !labels.is_empty() {
            obj.metadata.labels = Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            );
        }
        obj
    }

    fn lister_with(objs: Vec<MySQLBackupSchedule>) -> ScheduleLister {
        ScheduleLister::new(Arc::new(store_with(objs)))
    }

    fn names(objs: &[Arc<MySQLBackupSchedule>]) -> Vec<String> {
        let mut names: Vec<String> = objs
            .iter()
            .map(|o| {
                format!(
                    "{}/{}",
                    o.metadata.namespace.as_deref().unwrap_or_default(),
                    o.metadata.name.as_deref().unwrap_or_default()
                )
            })
            .collect();
        names.sort();
        names
    }

    /// Indexer whose every read fails
    struct BrokenIndexer;

    fn broken() -> CacheError {
        CacheError::InvalidKey("default/daily/extra".to_string())
    }

    impl Indexer<MySQLBackupSchedule> for BrokenIndexer {
        fn get_by_key(&self, _key: &str) -> Result<Option<Arc<MySQLBackupSchedule>>, CacheError> {
            Err(broken())
        }

        fn list(&self) -> Result<Vec<Arc<MySQLBackupSchedule>>, CacheError> {
            Err(broken())
        }

        fn by_namespace(&self, _namespace: &str) -> Result<Vec<Arc<MySQLBackupSchedule>>, CacheError> {
            Err(broken())
        }
    }

    #[test]
    fn test_scenario_two_namespaces() {
        let daily = schedule("default", "daily", "db", &[]);
        let weekly = schedule("ops", "weekly", "db", &[]);
        let lister = lister_with(vec![daily.clone(), weekly]);

        let in_default = lister.for_namespace("default").list(&Selector::everything()).unwrap();
        assert_eq!(in_default.len(), 1);
        assert_eq!(*in_default[0], daily);

        let err = lister.for_namespace("default").get("weekly").unwrap_err();
        assert!(err.is_not_found());

        let all = lister.list(&Selector::everything()).unwrap();
        assert_eq!(names(&all), vec!["default/daily", "ops/weekly"]);
    }

    #[test]
    fn test_get_returns_inserted_object() {
        let daily = schedule("default", "daily", "db", &[("tier", "gold")]);
        let lister = lister_with(vec![daily.clone()]);

        let got = lister.for_namespace("default").get("daily").unwrap();
        assert_eq!(*got, daily);
    }

    #[test]
    fn test_get_absent_is_not_found() {
        let lister = lister_with(vec![schedule("default", "daily", "db", &[])]);

        match lister.for_namespace("ops").get("daily") {
            Err(ListerError::NotFound { resource, name }) => {
                assert_eq!(name, "daily");
                assert_eq!(
                    resource.to_string(),
                    "mysqlbackupschedule.cr.mysqloperator.grtl.github.com"
                );
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_list_with_selector() {
        let lister = lister_with(vec![
            schedule("default", "daily", "db", &[("tier", "gold")]),
            schedule("default", "hourly", "db", &[("tier", "silver")]),
            schedule("ops", "weekly", "db", &[("tier", "gold")]),
        ]);
        let gold = Selector::parse("tier=gold").unwrap();

        assert_eq!(
            names(&lister.list(&gold).unwrap()),
            vec!["default/daily", "ops/weekly"]
        );
        assert_eq!(
            names(&lister.for_namespace("default").list(&gold).unwrap()),
            vec!["default/daily"]
        );
    }

    #[test]
    fn test_namespace_list_never_crosses_namespaces() {
        let lister = lister_with(vec![
            schedule("default", "daily", "db", &[]),
            schedule("ops", "weekly", "db", &[]),
            schedule("ops", "monthly", "db", &[]),
        ]);

        let ops = lister.for_namespace("ops").list(&Selector::everything()).unwrap();
        assert_eq!(names(&ops), vec!["ops/monthly", "ops/weekly"]);
        assert!(
            ops.iter()
                .all(|s| s.metadata.namespace.as_deref() == Some("ops"))
        );
    }

    #[test]
    fn test_unknown_namespace_is_empty() {
        let lister = lister_with(vec![schedule("default", "daily", "db", &[])]);
        let namespaced = lister.for_namespace("nowhere");
        assert_eq!(namespaced.namespace(), "nowhere");
        assert!(namespaced.list(&Selector::everything()).unwrap().is_empty());
    }

    #[test]
    fn test_cache_errors_propagate() {
        let lister = ScheduleLister::new(Arc::new(BrokenIndexer));

        assert_eq!(
            lister.list(&Selector::everything()).unwrap_err(),
            ListerError::Cache(broken())
        );

        let namespaced = lister.for_namespace("default");
        assert_eq!(
            namespaced.list(&Selector::everything()).unwrap_err(),
            ListerError::Cache(broken())
        );

        // A failed lookup is not reported as absence
        let err = namespaced.get("daily").unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err, ListerError::Cache(broken()));
    }

    #[test]
    fn test_list_for_cluster() {
        let lister = lister_with(vec![
            schedule("default", "daily", "db", &[]),
            schedule("default", "hourly", "analytics", &[]),
            schedule("ops", "weekly", "db", &[]),
        ]);

        assert_eq!(
            names(&lister.list_for_cluster("db").unwrap()),
            vec!["default/daily", "ops/weekly"]
        );
        assert_eq!(
            names(&lister.for_namespace("default").list_for_cluster("db").unwrap()),
            vec!["default/daily"]
        );
        assert!(lister.list_for_cluster("missing").unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_reads_during_writes() {
        let mut writer: Writer<MySQLBackupSchedule> = Writer::default();
        let lister = ScheduleLister::new(Arc::new(writer.as_reader()));
        let app = Selector::parse("app=mysql").unwrap();

        std::thread::scope(|s| {
            let (lister, app) = (&lister, &app);
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        let namespaced = lister.for_namespace("default");
                        for _ in 0..500 {
                            for obj in namespaced.list(&Selector::everything()).unwrap() {
                                assert_eq!(obj.metadata.namespace.as_deref(), Some("default"));
                            }
                            for obj in lister.list(&app).unwrap() {
                                assert!(app.matches(&obj.metadata.labels.clone().unwrap_or_default()));
                            }
                            match namespaced.get("daily") {
                                Ok(obj) => {
                                    assert_eq!(obj.metadata.name.as_deref(), Some("daily"));
                                    assert_eq!(obj.metadata.namespace.as_deref(), Some("default"));
                                }
                                Err(e) => assert!(e.is_not_found(), "unexpected error: {e}"),
                            }
                        }
                    })
                })
                .collect();

            for round in 0..200 {
                let daily = schedule("default", "daily", "db", &[("app", "mysql")]);
                let other = schedule("ops", "daily", "db", &[("app", "mysql")]);
                writer.apply_watcher_event(&Event::Apply(daily.clone()));
                writer.apply_watcher_event(&Event::Apply(other.clone()));
                writer.apply_watcher_event(&Event::Apply(schedule("default", "hourly", "db", &[])));
                writer.apply_watcher_event(&Event::Delete(daily.clone()));

                if round % 20 == 0 {
                    writer.apply_watcher_event(&Event::Init);
                    writer.apply_watcher_event(&Event::InitApply(daily));
                    writer.apply_watcher_event(&Event::InitApply(other));
                    writer.apply_watcher_event(&Event::InitDone);
                }
            }

            for reader in readers {
                reader.join().unwrap();
            }
        });

        // Last round deleted default/daily; ops/daily is still cached
        assert!(lister.for_namespace("default").get("daily").unwrap_err().is_not_found());
        assert!(lister.for_namespace("ops").get("daily").is_ok());
    }
}
