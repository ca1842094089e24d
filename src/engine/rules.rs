//! Rule trait and the built-in recommended rulesets.

use crate::core::config::{LinterKind, Severity};
use crate::model::element::DiagramModel;

/// A finding collected while evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reported {
    /// Id of the offending element, when attributable.
    pub element_id: Option<String>,
    /// Description of the violation.
    pub message: String,
}

/// Collector handed to rules during evaluation.
#[derive(Debug, Default)]
pub struct RuleReporter {
    entries: Vec<Reported>,
}

impl RuleReporter {
    /// Record a violation.
    pub fn report(&mut self, element_id: Option<&str>, message: impl Into<String>) {
        self.entries.push(Reported {
            element_id: element_id.map(ToOwned::to_owned),
            message: message.into(),
        });
    }

    /// Consume the reporter, yielding findings in report order.
    pub fn into_entries(self) -> Vec<Reported> {
        self.entries
    }
}

/// A lint rule evaluated against a whole diagram model.
pub trait Rule: Send + Sync {
    /// Evaluate the rule, recording violations on the reporter.
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter);
}

/// Containers that must hold start/end events.
const EVENT_CONTAINERS: &[&str] = &["bpmn:Process", "bpmn:SubProcess"];

/// Flow node types that require a label.
const LABELED_TYPES: &[&str] = &[
    "bpmn:Task",
    "bpmn:UserTask",
    "bpmn:ServiceTask",
    "bpmn:ScriptTask",
    "bpmn:ManualTask",
    "bpmn:BusinessRuleTask",
    "bpmn:SendTask",
    "bpmn:ReceiveTask",
    "bpmn:CallActivity",
    "bpmn:ExclusiveGateway",
    "bpmn:ParallelGateway",
    "bpmn:InclusiveGateway",
    "bpmn:EventBasedGateway",
    "bpmn:ComplexGateway",
    "bpmn:IntermediateCatchEvent",
    "bpmn:IntermediateThrowEvent",
];

/// Decision logic containers accepted by `no-empty-decision`.
const DECISION_LOGIC_TYPES: &[&str] = &[
    "dmn:DecisionTable",
    "dmn:LiteralExpression",
    "dmn:Invocation",
];

struct StartEventRequired;

impl Rule for StartEventRequired {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        for container in model
            .elements()
            .filter(|el| EVENT_CONTAINERS.contains(&el.type_name()))
        {
            let has_start = container
                .children
                .iter()
                .any(|child| child.type_name() == "bpmn:StartEvent");
            if !has_start {
                reporter.report(container.id(), "Process is missing required start event");
            }
        }
    }
}

struct EndEventRequired;

impl Rule for EndEventRequired {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        for container in model
            .elements()
            .filter(|el| EVENT_CONTAINERS.contains(&el.type_name()))
        {
            let has_end = container
                .children
                .iter()
                .any(|child| child.type_name() == "bpmn:EndEvent");
            if !has_end {
                reporter.report(container.id(), "Process is missing required end event");
            }
        }
    }
}

struct LabelRequired;

impl Rule for LabelRequired {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        for element in model
            .elements()
            .filter(|el| LABELED_TYPES.contains(&el.type_name()))
        {
            if element.name().is_none() {
                reporter.report(element.id(), "Element is missing label/name");
            }
        }
    }
}

struct DecisionNameRequired;

impl Rule for DecisionNameRequired {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        for decision in model
            .elements()
            .filter(|el| el.type_name() == "dmn:Decision")
        {
            if decision.name().is_none() {
                reporter.report(decision.id(), "Decision is missing a name");
            }
        }
    }
}

struct NoEmptyDecision;

impl Rule for NoEmptyDecision {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        for decision in model
            .elements()
            .filter(|el| el.type_name() == "dmn:Decision")
        {
            let has_logic = decision
                .children
                .iter()
                .any(|child| DECISION_LOGIC_TYPES.contains(&child.type_name()));
            if !has_logic {
                reporter.report(decision.id(), "Decision has no decision logic");
            }
        }
    }
}

/// The built-in recommended ruleset for a linter type, with default
/// severities, in resolution order.
pub fn recommended(kind: LinterKind) -> Vec<(String, Severity, Box<dyn Rule>)> {
    match kind {
        LinterKind::Bpmn => vec![
            (
                "start-event-required".to_string(),
                Severity::Error,
                Box::new(StartEventRequired) as Box<dyn Rule>,
            ),
            (
                "end-event-required".to_string(),
                Severity::Error,
                Box::new(EndEventRequired),
            ),
            (
                "label-required".to_string(),
                Severity::Warn,
                Box::new(LabelRequired),
            ),
        ],
        LinterKind::Dmn => vec![
            (
                "decision-name-required".to_string(),
                Severity::Error,
                Box::new(DecisionNameRequired) as Box<dyn Rule>,
            ),
            (
                "no-empty-decision".to_string(),
                Severity::Warn,
                Box::new(NoEmptyDecision),
            ),
        ],
    }
}
