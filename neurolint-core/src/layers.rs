//! Static reference data for the seven layers.

use crate::domain::{LayerInfo, LayerRule};

/// Number of layers in the catalog.
pub const LAYER_COUNT: u8 = 7;

/// Every layer id, in order.
pub const ALL_LAYER_IDS: [u8; LAYER_COUNT as usize] = [1, 2, 3, 4, 5, 6, 7];

/// A rule entry in the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Stable rule identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// A layer entry in the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDefinition {
    /// Layer id, 1-7.
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Rules grouped under this layer.
    pub rules: &'static [RuleDefinition],
}

impl LayerDefinition {
    /// Convert to the owned wire representation.
    pub fn to_info(&self) -> LayerInfo {
        LayerInfo {
            id: self.id,
            name: self.name.to_string(),
            description: self.description.to_string(),
            rules: self
                .rules
                .iter()
                .map(|rule| LayerRule {
                    id: rule.id.to_string(),
                    name: rule.name.to_string(),
                    description: rule.description.to_string(),
                })
                .collect(),
        }
    }
}

const fn rule(
    id: &'static str,
    name: &'static str,
    description: &'static str,
) -> RuleDefinition {
    RuleDefinition {
        id,
        name,
        description,
    }
}

/// The layer catalog, indexed by `id - 1`.
pub static LAYERS: [LayerDefinition; LAYER_COUNT as usize] = [
    LayerDefinition {
        id: 1,
        name: "Configuration Modernization",
        description: "TypeScript, Next.js, and package.json updates",
        rules: &[
            rule("tsconfig-target", "TypeScript Target", "Update TypeScript target to ES2022"),
            rule("tsconfig-strict-mode", "Strict Mode", "Enable TypeScript strict mode"),
            rule("nextjs-config", "Next.js Config", "Modernize Next.js configuration"),
        ],
    },
    LayerDefinition {
        id: 2,
        name: "Content Standardization",
        description: "Pattern fixes, entity cleanup, and syntax modernization",
        rules: &[
            rule("var-to-const", "Var to Const", "Convert var to const/let"),
            rule("html-entities", "HTML Entities", "Fix HTML entity encoding"),
            rule("remove-console", "Console Cleanup", "Remove console statements"),
        ],
    },
    LayerDefinition {
        id: 3,
        name: "Component Intelligence",
        description: "React component modernization with accessibility and TypeScript",
        rules: &[
            rule("add-aria-labels", "ARIA Labels", "Add accessibility labels"),
            rule("missing-key-prop", "List Keys", "Add key props to mapped elements"),
            rule("typescript-interfaces", "TypeScript Interfaces", "Add TypeScript interfaces"),
        ],
    },
    LayerDefinition {
        id: 4,
        name: "SSR/Hydration Safety",
        description: "Client-server consistency and hydration error prevention",
        rules: &[
            rule("use-client-directive", "Use Client Directive", "Add 'use client' directive"),
            rule("safe-client-apis", "Safe Client APIs", "Add SSR guards for client APIs"),
            rule("hydration-safety", "Hydration Safety", "Fix hydration mismatches"),
        ],
    },
    LayerDefinition {
        id: 5,
        name: "Next.js App Router Optimization",
        description: "App Router migration and optimization",
        rules: &[
            rule("router-imports", "Router Imports", "Update router imports"),
            rule("metadata-exports", "Metadata Exports", "Add metadata exports"),
            rule("app-router-patterns", "App Router Patterns", "Apply App Router patterns"),
        ],
    },
    LayerDefinition {
        id: 6,
        name: "Testing & Validation",
        description: "Automated test generation and testing library updates",
        rules: &[
            rule("generate-component-tests", "Component Tests", "Generate component tests"),
            rule("update-testing-library", "Testing Library", "Update testing library"),
            rule("test-coverage", "Test Coverage", "Add test coverage"),
        ],
    },
    LayerDefinition {
        id: 7,
        name: "Adaptive Pattern Learning",
        description: "Machine learning-based pattern detection and custom rules",
        rules: &[
            rule("adaptive-patterns", "Adaptive Patterns", "Detect custom patterns"),
            rule("team-conventions", "Team Conventions", "Apply team conventions"),
            rule("custom-patterns", "Custom Patterns", "Apply custom patterns"),
        ],
    },
];

/// Look up a layer by id; `None` outside 1-7.
pub fn find_layer(id: u8) -> Option<&'static LayerDefinition> {
    if !(1..=LAYER_COUNT).contains(&id) {
        return None;
    }
    LAYERS.get(usize::from(id - 1))
}

/// The full catalog in wire form.
pub fn layer_catalog() -> Vec<LayerInfo> {
    LAYERS.iter().map(LayerDefinition::to_info).collect()
}

/// Total number of rules across all layers.
pub fn total_rules() -> usize {
    LAYERS.iter().map(|layer| layer.rules.len()).sum()
}
