// src/noyau/erreur.rs
//
// Taxonomie des erreurs du noyau
// ------------------------------
// - Lexicale / Syntaxe : interrompent la lecture (aucun arbre partiel)
// - Domaine / DivisionParZero / SymboleLibre : consignées dans le Contexte,
//   la sous-expression retombe à 0 (ou NaN en mode strict)
// - LitteralHorsBornes : consignée, le littéral garde sa valeur saturée (inf ou 0)
// - Interne : échec d'initialisation du moteur numérique

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurLexicale {
    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("littéral numérique invalide: \"{0}\"")]
    LitteralInvalide(String),

    #[error("opérateur incomplet: '{0}' doit être suivi de '='")]
    OperateurIncomplet(char),

    #[error("entrée trop longue ({longueur} caractères, maximum {max})")]
    EntreeTropLongue { longueur: usize, max: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurSyntaxe {
    #[error("jeton inattendu: {0}")]
    JetonInattendu(String),

    #[error("fin d'expression inattendue")]
    FinInattendue,

    #[error("parenthèse fermante attendue")]
    ParentheseFermanteAttendue,

    #[error("parenthèse ouvrante attendue après {0}")]
    ParentheseOuvranteAttendue(&'static str),

    #[error("la fonction {fonction} attend {attendu} argument(s), reçu {recu}")]
    Arite {
        fonction: &'static str,
        attendu: usize,
        recu: usize,
    },

    #[error("fonction ou variable inconnue: {0}")]
    IdentifiantInconnu(String),

    #[error("jetons restants après l'expression: {0}")]
    JetonsRestants(String),

    #[error("profondeur d'imbrication maximale atteinte ({0})")]
    ProfondeurMaximale(usize),

    #[error("trop de multiplications implicites (maximum {0})")]
    TropDeMultiplicationsImplicites(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Erreur {
    #[error("erreur lexicale: {0}")]
    Lexicale(#[from] ErreurLexicale),

    #[error("erreur de syntaxe: {0}")]
    Syntaxe(#[from] ErreurSyntaxe),

    #[error("erreur de domaine: {fonction} exige {contrainte}")]
    Domaine {
        fonction: &'static str,
        contrainte: &'static str,
    },

    #[error("division par zéro")]
    DivisionParZero,

    #[error("symbole sans valeur numérique: {0}")]
    SymboleLibre(String),

    #[error("littéral hors de la plage des exposants: {0}")]
    LitteralHorsBornes(String),

    #[error("erreur interne: {0}")]
    Interne(String),
}

impl Erreur {
    /// Vrai pour les erreurs qui interrompent la lecture (aucun arbre produit).
    pub fn est_fatale(&self) -> bool {
        matches!(self, Erreur::Lexicale(_) | Erreur::Syntaxe(_))
    }
}

impl From<astro_float::Error> for Erreur {
    fn from(e: astro_float::Error) -> Self {
        Erreur::Interne(format!("moteur multiprécision: {e:?}"))
    }
}
