use investplan::domain::{
    ConstructionActionCommand, MaterialCommand, OrgUnitCommand, PlanCommand, PropertyCommand,
    ProvinceCommand, SpecialtyCommand, UnitOfMeasureCommand, WorkObjectCommand,
};
use investplan::{AdminService, BizError, InvestorService, Lookup, Registration, Result, Store};
use serde::{Deserialize, Serialize};

/// A JSON batch of commands, applied in order
#[derive(Debug, Deserialize)]
pub struct Batch {
    pub commands: Vec<BatchEntry>,
}

/// One command plus the natural keys of the references it needs
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BatchEntry {
    Province {
        command: ProvinceCommand,
    },
    OrgUnit {
        province: String,
        command: OrgUnitCommand,
    },
    Plan {
        #[serde(default)]
        org_unit: Option<String>,
        command: PlanCommand,
    },
    Property {
        org_unit: String,
        command: PropertyCommand,
    },
    WorkObject {
        org_unit: String,
        address: String,
        command: WorkObjectCommand,
    },
    Specialty {
        command: SpecialtyCommand,
    },
    UnitOfMeasure {
        command: UnitOfMeasureCommand,
    },
    Material {
        unit_of_measure: String,
        command: MaterialCommand,
    },
    ConstructionAction {
        command: ConstructionActionCommand,
    },
}

impl BatchEntry {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Province { .. } => "province",
            Self::OrgUnit { .. } => "org_unit",
            Self::Plan { .. } => "plan",
            Self::Property { .. } => "property",
            Self::WorkObject { .. } => "work_object",
            Self::Specialty { .. } => "specialty",
            Self::UnitOfMeasure { .. } => "unit_of_measure",
            Self::Material { .. } => "material",
            Self::ConstructionAction { .. } => "construction_action",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub index: usize,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Registration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Applies batches against one store. A fatal error on one entry is
/// reported and does not stop the entries after it.
pub struct BatchRunner {
    lookup: Lookup,
    admin: AdminService,
    investor: InvestorService,
}

impl BatchRunner {
    pub fn new(store: Store) -> Self {
        Self {
            lookup: Lookup::new(store.clone()),
            admin: AdminService::new(store.clone()),
            investor: InvestorService::new(store),
        }
    }

    pub async fn apply(&self, batch: Batch) -> Vec<EntryReport> {
        let mut reports = Vec::with_capacity(batch.commands.len());
        for (index, entry) in batch.commands.into_iter().enumerate() {
            let action = entry.action();
            let report = match self.apply_entry(entry).await {
                Ok(outcome) => EntryReport {
                    index,
                    action,
                    outcome: Some(outcome),
                    error: None,
                },
                Err(err) => EntryReport {
                    index,
                    action,
                    outcome: None,
                    error: Some(err.to_string()),
                },
            };
            reports.push(report);
        }
        reports
    }

    async fn apply_entry(&self, entry: BatchEntry) -> Result<Registration> {
        match entry {
            BatchEntry::Province { command } => self.admin.register_province(&command).await,
            BatchEntry::OrgUnit { province, command } => {
                self.admin.register_org_unit(command, &province).await
            }
            BatchEntry::Plan {
                org_unit,
                mut command,
            } => {
                if let Some(name) = org_unit {
                    let found = self.lookup.org_unit_by_name(&name).await.ok_or_else(|| {
                        BizError::MissingReference(format!("org unit '{}' does not exist", name))
                    })?;
                    command.org_unit = Some(found);
                }
                self.investor.register_plan(&command).await
            }
            BatchEntry::Property { org_unit, command } => {
                self.investor.register_property(command, &org_unit).await
            }
            BatchEntry::WorkObject {
                org_unit,
                address,
                command,
            } => {
                self.investor
                    .register_work_object(command, &org_unit, &address)
                    .await
            }
            BatchEntry::Specialty { command } => self.investor.register_specialty(&command).await,
            BatchEntry::UnitOfMeasure { command } => {
                self.investor.register_unit_of_measure(&command).await
            }
            BatchEntry::Material {
                unit_of_measure,
                command,
            } => {
                self.investor
                    .register_material(command, &unit_of_measure)
                    .await
            }
            BatchEntry::ConstructionAction { command } => {
                self.investor.register_construction_action(command).await
            }
        }
    }
}
