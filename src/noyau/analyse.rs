// src/noyau/analyse.rs
//
// Descente récursive :
//   comparaison → terme → facteur → puissance → unaire → primaire
// - niveaux gauche-associatifs en boucle ; puissance droite-associative (récursion sur elle-même)
// - multiplication implicite décidée sur (jeton précédent, jeton courant), sans consommer de jeton
// - chaque niveau passe par `garde` : profondeur bornée par le Contexte
// - la première erreur interrompt tout ; jamais d'arbre partiel

use super::erreur::{Erreur, ErreurSyntaxe};
use super::expr::{Expr, Nombre, OpBinaire, OpUnaire};
use super::jetons::{Lexeur, Tok};
use super::precision::Contexte;
use super::registre::Fonction;

/// Borne par chaîne de facteurs (anti-entrée pathologique).
pub const MULTIPLICATIONS_IMPLICITES_MAX: usize = 500;

pub fn parse(texte: &str, ctx: &mut Contexte) -> Result<Expr, Erreur> {
    Analyseur::new(texte, ctx, false).analyser()
}

/// Variante symbolique : un identifiant inconnu devient un symbole libre (`Expr::Constante`).
pub fn parse_avec_symboles(texte: &str, ctx: &mut Contexte) -> Result<Expr, Erreur> {
    Analyseur::new(texte, ctx, true).analyser()
}

struct Analyseur<'a> {
    lex: Lexeur,
    courant: Tok,
    precedent: Option<Tok>,
    profondeur: usize,
    symboles_libres: bool,
    ctx: &'a mut Contexte,
}

impl<'a> Analyseur<'a> {
    fn new(texte: &str, ctx: &'a mut Contexte, symboles_libres: bool) -> Self {
        let mut lex = Lexeur::new(texte);
        let courant = lex.next_token();
        Self {
            lex,
            courant,
            precedent: None,
            profondeur: 0,
            symboles_libres,
            ctx,
        }
    }

    fn analyser(mut self) -> Result<Expr, Erreur> {
        if let Some(e) = self.lex.entree_rejetee() {
            return Err(e.into());
        }

        let e = self.comparaison()?;

        match &self.courant {
            Tok::Fin => Ok(e),
            Tok::Invalide(err) => Err(err.clone().into()),
            // "2x" : la multiplication implicite ne s'applique pas à un nom inconnu
            Tok::Ident(nom) => Err(ErreurSyntaxe::IdentifiantInconnu(nom.clone()).into()),
            t => Err(ErreurSyntaxe::JetonsRestants(t.to_string()).into()),
        }
    }

    /* ------------------------ curseur ------------------------ */

    fn avancer(&mut self) {
        let suivant = self.lex.next_token();
        self.precedent = Some(std::mem::replace(&mut self.courant, suivant));
    }

    fn inattendu(&self) -> Erreur {
        match &self.courant {
            Tok::Invalide(e) => e.clone().into(),
            Tok::Fin => ErreurSyntaxe::FinInattendue.into(),
            t => ErreurSyntaxe::JetonInattendu(t.to_string()).into(),
        }
    }

    fn attendre_rpar(&mut self) -> Result<(), Erreur> {
        match &self.courant {
            Tok::RPar => {
                self.avancer();
                Ok(())
            }
            Tok::Invalide(e) => Err(e.clone().into()),
            _ => Err(ErreurSyntaxe::ParentheseFermanteAttendue.into()),
        }
    }

    /// Compteur de profondeur partagé par tous les niveaux de la grammaire.
    fn garde(
        &mut self,
        niveau: fn(&mut Self) -> Result<Expr, Erreur>,
    ) -> Result<Expr, Erreur> {
        let max = self.ctx.profondeur_max();
        if self.profondeur >= max {
            return Err(ErreurSyntaxe::ProfondeurMaximale(max).into());
        }
        self.profondeur += 1;
        let r = niveau(self);
        self.profondeur -= 1;
        r
    }

    /* ------------------------ niveaux ------------------------ */

    fn comparaison(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let mut g = s.terme()?;
            while let Some(op) = op_comparaison(&s.courant) {
                s.avancer();
                let d = s.terme()?;
                g = Expr::binop(op, g, d);
            }
            Ok(g)
        })
    }

    fn terme(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let mut g = s.facteur()?;
            loop {
                let op = match s.courant {
                    Tok::Plus => OpBinaire::Plus,
                    Tok::Minus => OpBinaire::Moins,
                    _ => break,
                };
                s.avancer();
                let d = s.facteur()?;
                g = Expr::binop(op, g, d);
            }
            Ok(g)
        })
    }

    fn facteur(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let mut g = s.puissance()?;
            let mut implicites = 0usize;
            loop {
                if s.multiplication_implicite() {
                    implicites += 1;
                    if implicites > MULTIPLICATIONS_IMPLICITES_MAX {
                        return Err(ErreurSyntaxe::TropDeMultiplicationsImplicites(
                            MULTIPLICATIONS_IMPLICITES_MAX,
                        )
                        .into());
                    }
                    // le jeton courant devient l'opérande droit
                    let d = s.puissance()?;
                    g = Expr::binop(OpBinaire::Fois, g, d);
                    continue;
                }

                let op = match s.courant {
                    Tok::Star => OpBinaire::Fois,
                    Tok::Slash => OpBinaire::Divise,
                    _ => break,
                };
                s.avancer();
                let d = s.puissance()?;
                g = Expr::binop(op, g, d);
            }
            Ok(g)
        })
    }

    fn puissance(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let base = s.unaire()?;
            if s.courant == Tok::Caret {
                s.avancer();
                let exposant = s.puissance()?;
                return Ok(Expr::binop(OpBinaire::Puissance, base, exposant));
            }
            Ok(base)
        })
    }

    fn unaire(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let op = match s.courant {
                Tok::Plus => OpUnaire::Plus,
                Tok::Minus => OpUnaire::Moins,
                _ => return s.primaire(),
            };
            s.avancer();
            let x = s.unaire()?;
            Ok(Expr::unaire(op, x))
        })
    }

    fn primaire(&mut self) -> Result<Expr, Erreur> {
        self.garde(|s| {
            let e = match &s.courant {
                Tok::Entier(l) | Tok::Flottant(l) => {
                    let est_entier = matches!(s.courant, Tok::Entier(_));
                    let texte = l.texte.clone();
                    Expr::Nombre(Nombre::depuis_litteral(&texte, est_entier, s.ctx))
                }
                Tok::Constante(c) => Expr::Constante(c.nom().to_string()),
                Tok::Ident(nom) if s.symboles_libres => Expr::Constante(nom.clone()),
                Tok::Ident(nom) => {
                    return Err(ErreurSyntaxe::IdentifiantInconnu(nom.clone()).into())
                }
                Tok::Fonction(f) => {
                    let f = *f;
                    return s.appel(f);
                }
                Tok::LPar => {
                    s.avancer();
                    let e = s.comparaison()?;
                    s.attendre_rpar()?;
                    return Ok(e);
                }
                _ => return Err(s.inattendu()),
            };
            s.avancer();
            Ok(e)
        })
    }

    fn appel(&mut self, f: Fonction) -> Result<Expr, Erreur> {
        self.avancer();
        if self.courant != Tok::LPar {
            return Err(ErreurSyntaxe::ParentheseOuvranteAttendue(f.nom()).into());
        }
        self.avancer();

        let mut args = Vec::with_capacity(f.arite());
        if self.courant != Tok::RPar {
            loop {
                args.push(self.comparaison()?);
                if self.courant != Tok::Virgule {
                    break;
                }
                self.avancer();
            }
        }

        if args.len() != f.arite() {
            return Err(ErreurSyntaxe::Arite {
                fonction: f.nom(),
                attendu: f.arite(),
                recu: args.len(),
            }
            .into());
        }

        self.attendre_rpar()?;
        Ok(Expr::Appel(f, args))
    }

    /* ------------------------ multiplication implicite ------------------------ */

    fn est_constante(&self, t: &Tok) -> bool {
        matches!(t, Tok::Constante(_)) || (self.symboles_libres && matches!(t, Tok::Ident(_)))
    }

    /// NOMBRE·(   )·(   )·NOMBRE   NOMBRE·NOMBRE   NOMBRE·FONCTION   )·FONCTION
    /// (NOMBRE|))·CONSTANTE   CONSTANTE·(NOMBRE|()
    fn multiplication_implicite(&self) -> bool {
        let prec = match &self.precedent {
            Some(t) => t,
            None => return false,
        };
        let cur = &self.courant;

        let prec_valeur = prec.est_nombre() || *prec == Tok::RPar;
        let cur_ouvrant = *cur == Tok::LPar || cur.est_nombre();

        let ok = (prec_valeur && cur_ouvrant)
            || (prec_valeur && matches!(cur, Tok::Fonction(_)))
            || (prec_valeur && self.est_constante(cur))
            || (self.est_constante(prec) && cur_ouvrant);

        if ok {
            log::trace!("multiplication implicite: {prec} · {cur}");
        }
        ok
    }
}

fn op_comparaison(t: &Tok) -> Option<OpBinaire> {
    Some(match t {
        Tok::EgalEgal => OpBinaire::Egal,
        Tok::Different => OpBinaire::Different,
        Tok::Inf => OpBinaire::Inf,
        Tok::InfEgal => OpBinaire::InfEgal,
        Tok::Sup => OpBinaire::Sup,
        Tok::SupEgal => OpBinaire::SupEgal,
        _ => return None,
    })
}
