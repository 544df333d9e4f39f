// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! Assertion document of the token.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use rsa::traits::PublicKeyParts;

use crate::identity::types::PrincipalId;
use crate::token::types::{
    Assertion, Confirmation, IssuedToken, SignatureAlgorithm, TokenSignature,
};
use crate::token::xml::Element;

const SAML2_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";
const DS_NS: &str = "http://www.w3.org/2000/09/xmldsig#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const STS_NS: &str = "urn:sts-core:assertion";
const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
const ENTITY_FORMAT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:entity";
const UPN_FORMAT: &str = "http://schemas.xmlsoap.org/claims/UPN";
const GROUPS_ATTRIBUTE: &str = "http://rsa.com/schemas/attr-names/2009/01/GroupIdentity";
const URI_ATTRIBUTE_FORMAT: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:uri";

/// Element the signature is inserted in front of.
const SIGNATURE_SUCCESSOR: &str = "saml2:Subject";

fn instant(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn name_id(principal: &PrincipalId) -> Element {
    Element::new("saml2:NameID")
        .attr("Format", UPN_FORMAT)
        .attr("NameQualifier", &principal.domain)
        .text(principal.upn())
}

impl Assertion {
    /// Assertion element without the signature.
    pub(crate) fn to_element(&self) -> Element {
        Element::new("saml2:Assertion")
            .attr("xmlns:saml2", SAML2_NS)
            .attr("xmlns:sts", STS_NS)
            .attr("xmlns:xsd", XSD_NS)
            .attr("xmlns:xsi", XSI_NS)
            .attr("ID", &self.id)
            .attr("IssueInstant", instant(self.issue_instant))
            .attr("Version", "2.0")
            .child(
                Element::new("saml2:Issuer")
                    .attr("Format", ENTITY_FORMAT)
                    .text(&self.issuer),
            )
            .child(self.subject_element())
            .child(self.conditions_element())
            .children(self.advice_element())
            .children(self.authn_statement())
            .children(self.attribute_statement())
    }

    /// Canonical form of the assertion the signature digest is computed
    /// over (the enveloped signature is excluded).
    pub fn canonical(&self) -> String {
        self.to_element().to_canonical_string()
    }

    fn subject_element(&self) -> Element {
        let confirmation_data = match &self.confirmation {
            Confirmation::Bearer {
                in_response_to,
                recipient,
            } => Element::new("saml2:SubjectConfirmationData")
                .attr_opt("InResponseTo", in_response_to.as_deref())
                .attr_opt(
                    "NotOnOrAfter",
                    self.subject_confirmation_not_on_or_after.map(instant),
                )
                .attr_opt("Recipient", recipient.as_deref()),
            Confirmation::HolderOfKey { key } => Element::new("saml2:SubjectConfirmationData")
                .attr("xsi:type", "saml2:KeyInfoConfirmationDataType")
                .child(
                    Element::new("ds:KeyInfo").attr("xmlns:ds", DS_NS).child(
                        Element::new("ds:KeyValue").child(
                            Element::new("ds:RSAKeyValue")
                                .child(
                                    Element::new("ds:Modulus")
                                        .text(STANDARD.encode(key.n().to_bytes_be())),
                                )
                                .child(
                                    Element::new("ds:Exponent")
                                        .text(STANDARD.encode(key.e().to_bytes_be())),
                                ),
                        ),
                    ),
                ),
        };
        Element::new("saml2:Subject")
            .child(name_id(&self.subject))
            .child(
                Element::new("saml2:SubjectConfirmation")
                    .attr("Method", self.confirmation.method())
                    .child(confirmation_data),
            )
    }

    fn conditions_element(&self) -> Element {
        let audience = (!self.audience.is_empty()).then(|| {
            Element::new("saml2:AudienceRestriction").children(
                self.audience
                    .iter()
                    .map(|aud| Element::new("saml2:Audience").text(aud)),
            )
        });
        Element::new("saml2:Conditions")
            .attr("NotBefore", instant(self.not_before))
            .attr("NotOnOrAfter", instant(self.not_on_or_after))
            .children(audience)
            .child(
                Element::new("saml2:Condition")
                    .attr("xsi:type", "sts:RenewRestrictionType")
                    .attr("Count", self.renew_count.to_string())
                    .attr("Renewable", self.renewable.to_string()),
            )
            .child(
                Element::new("saml2:Condition")
                    .attr("xsi:type", "sts:DelegationRestrictionType")
                    .attr("Delegable", self.delegable.to_string())
                    .children(
                        self.delegation_chain
                            .iter()
                            .map(|delegate| Element::new("sts:Delegate").child(name_id(delegate))),
                    ),
            )
    }

    fn advice_element(&self) -> Option<Element> {
        (!self.advice.is_empty()).then(|| {
            Element::new("saml2:Advice").children(self.advice.iter().map(|(name, value)| {
                Element::new("sts:AdviceAttribute")
                    .attr("Name", name)
                    .text(value)
            }))
        })
    }

    fn authn_statement(&self) -> Option<Element> {
        self.authentication.as_ref().map(|authn| {
            Element::new("saml2:AuthnStatement")
                .attr("AuthnInstant", instant(authn.instant))
                .child(
                    Element::new("saml2:AuthnContext").child(
                        Element::new("saml2:AuthnContextClassRef")
                            .text(authn.method.context_class()),
                    ),
                )
        })
    }

    /// Groups as a single multi-valued attribute of `name/domain` values.
    fn attribute_statement(&self) -> Option<Element> {
        (!self.groups.is_empty()).then(|| {
            Element::new("saml2:AttributeStatement").child(
                Element::new("saml2:Attribute")
                    .attr("FriendlyName", "Groups")
                    .attr("Name", GROUPS_ATTRIBUTE)
                    .attr("NameFormat", URI_ATTRIBUTE_FORMAT)
                    .children(self.groups.iter().map(|group| {
                        Element::new("saml2:AttributeValue")
                            .attr("xsi:type", "xsd:string")
                            .text(format!("{}/{}", group.name, group.domain))
                    })),
            )
        })
    }
}

/// Signed info referencing the assertion.
pub(crate) fn signed_info(
    assertion_id: &str,
    algorithm: SignatureAlgorithm,
    digest: &[u8],
) -> Element {
    Element::new("ds:SignedInfo")
        .attr("xmlns:ds", DS_NS)
        .child(Element::new("ds:CanonicalizationMethod").attr("Algorithm", EXC_C14N))
        .child(Element::new("ds:SignatureMethod").attr("Algorithm", algorithm.uri()))
        .child(
            Element::new("ds:Reference")
                .attr("URI", format!("#{assertion_id}"))
                .child(
                    Element::new("ds:Transforms")
                        .child(Element::new("ds:Transform").attr("Algorithm", ENVELOPED_SIGNATURE))
                        .child(Element::new("ds:Transform").attr("Algorithm", EXC_C14N)),
                )
                .child(Element::new("ds:DigestMethod").attr("Algorithm", algorithm.digest_uri()))
                .child(Element::new("ds:DigestValue").text(STANDARD.encode(digest))),
        )
}

fn signature_element(assertion_id: &str, signature: &TokenSignature) -> Element {
    Element::new("ds:Signature")
        .attr("xmlns:ds", DS_NS)
        .child(signed_info(
            assertion_id,
            signature.algorithm,
            &signature.digest,
        ))
        .child(Element::new("ds:SignatureValue").text(STANDARD.encode(&signature.value)))
        .child(
            Element::new("ds:KeyInfo").child(
                Element::new("ds:X509Data").child(
                    Element::new("ds:X509Certificate")
                        .text(STANDARD.encode(signature.certificate.der())),
                ),
            ),
        )
}

impl IssuedToken {
    /// Signed assertion document of the token.
    pub fn to_xml(&self) -> String {
        let mut root = self.assertion().to_element();
        root.insert_before(
            SIGNATURE_SUCCESSOR,
            signature_element(self.assertion_id(), self.signature()),
        );
        root.to_canonical_string()
    }
}
