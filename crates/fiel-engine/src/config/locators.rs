use crate::locator::LocatorChain;
use serde::{Deserialize, Serialize};

/// Every locator chain the workflow uses, overridable per field from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalLocators {
    pub run_online_link: LocatorChain,
    pub method_tab: LocatorChain,
    /// Rendered-text needles tried when no `method_tab` locator matches.
    pub method_needles: Vec<String>,
    pub certificate_input: LocatorChain,
    pub key_input: LocatorChain,
    pub password_input: LocatorChain,
    pub sign_button: LocatorChain,
    pub generate_button: LocatorChain,
}

impl Default for PortalLocators {
    fn default() -> Self {
        Self {
            run_online_link: LocatorChain::new("run online link").xpath(
                "//a[contains(.,'Ejecutar en línea') or contains(.,'Ejecutar en linea')]",
            ),
            method_tab: LocatorChain::new("e.firma tab")
                .id("buttonFiel")
                .xpath(
                    "//*[self::a or self::button or self::div or self::span or self::label]\
                     [contains(translate(.,'ÉÍÓÚÁéíóúá','EIOUAeioua'),'E.FIRMA') or contains(.,'e.firma') or contains(.,'eFirma')]",
                )
                .xpath(
                    "//a[contains(@class,'nav-link') and contains(translate(.,'E.FIRMA','e.firma'),'e.firma')]",
                ),
            method_needles: ["e.firma", "efirma", "firma", "certificado"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            certificate_input: LocatorChain::new("certificate input")
                .css("input[type='file'][accept*='.cer' i]")
                .id("fileCer")
                .name("fileCer")
                .xpath(
                    "//label[contains(translate(normalize-space(.),'CERTIFICADO','certificado'),'CERTIFICADO')]/following::input[@type='file'][1]",
                ),
            key_input: LocatorChain::new("private key input")
                .css("input[type='file'][accept*='.key' i]")
                .id("fileKey")
                .name("fileKey")
                .xpath(
                    "//label[contains(translate(normalize-space(.),'LLAVE PRIVADA','llave privada'),'LLAVE PRIVADA')]/following::input[@type='file'][1]",
                )
                .xpath("//input[@type='file'][not(@value)]"),
            password_input: LocatorChain::new("key password input")
                .css("input[type='password']")
                .id("contrasena")
                .name("contrasena")
                .xpath(
                    "//label[contains(translate(.,'ÁÉÍÓÚáéíóú','AEIOUaeiou'),'CONTRASENA')]/following::input[@type='password'][1]",
                ),
            sign_button: LocatorChain::new("sign button")
                .xpath("//button[contains(translate(.,'ENVIAR','enviar'),'enviar')]")
                .xpath(
                    "//input[@type='submit' or @type='button'][contains(translate(@value,'ENVIAR','enviar'),'enviar')]",
                )
                .id("btnFirma")
                .name("btnFirma")
                .xpath(
                    "//button[contains(.,'Firmar') or contains(.,'Ingresar') or contains(.,'Acceder')]",
                ),
            generate_button: LocatorChain::new("generate button")
                .id("formReimpAcuse:j_idt50")
                .xpath("//button[.//span[contains(normalize-space(.),'Generar Constancia')]]")
                .xpath(
                    "//span[contains(normalize-space(.),'Generar Constancia')]/ancestor::button[1]",
                )
                .xpath("//button[contains(normalize-space(.),'Generar Constancia')]"),
        }
    }
}
